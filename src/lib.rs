//! # Sangfor AC Rust SDK
//!
//! A Rust client for the HTTP management API of the Sangfor AC
//! (access-control appliance).
//!
//! ## Modules
//!
//! - [`api`]: REST client, request signing pipeline and response envelope codec
//! - [`auth`]: nonce + MD5 digest signing with the shared API secret
//! - [`config`]: connection settings, loadable from the environment
//! - [`network`]: default port, API prefix and timeout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sangfor_ac::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AcApiClient::new("192.168.1.1:9999", "YR9nQngmvhX&9BE83K")?;
//!
//!     println!("version: {}", client.version().await?);
//!
//!     let users = client.user_search(&UserSearch::by_name("alice")).await?;
//!     println!("found {} users", users.len());
//!
//!     client.online_user_kick("192.168.1.23").await?;
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// REST API client module: endpoints, request builder, envelope codec.
pub mod api;

/// Request signing (nonce + keyed digest).
pub mod auth;

/// Client configuration.
pub mod config;

/// Network constants (default port, API prefix, timeout).
pub mod network;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use sangfor_ac::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "http")]
    pub use crate::api::{AcApiClient, AcApiClientBuilder};

    pub use crate::api::{
        ApiError, ApiResult, EnvelopeNormalizer, LogicalRequest,
        // Status
        AppRank, AppRankFilter, InsideLib, LogNum, Throughput, ThroughputFilter, UserRank,
        UserRankFilter,
        // Users, groups, policies
        GroupPolicySet, PolicyOp, UserAdd, UserDetail, UserPolicySet, UserSearch,
        FluxPolicy, NetPolicy, NetPolicyInfo, NetPolicyUserInfo,
        // Bindings
        AddrType, BindIpMac, BindUser, NoAuth,
        // Online users
        OnlineUser, OnlineUserQuery, OnlineUserUp, OnlineUsers,
    };

    pub use crate::auth::{SignedNonce, Signer};
    pub use crate::config::AcConfig;
    pub use crate::network::DEFAULT_PORT;
}
