//! HTTP management API client for the Sangfor AC.
//!
//! This module provides a type-safe client for the appliance's `/v1/` API:
//! device status, users, groups, policies, IP/MAC bindings and online users.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sangfor_ac::api::AcApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Address is host[:port], the port defaults to 9999
//!     let client = AcApiClient::new("192.168.1.1", "YR9nQngmvhX&9BE83K")?;
//!
//!     println!("CPU: {}%", client.cpu_usage().await?);
//!     for lib in client.inside_lib().await? {
//!         println!("{} {} -> {}", lib.name, lib.current, lib.new);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Client Configuration
//!
//! ```rust,ignore
//! use sangfor_ac::api::AcApiClient;
//! use std::time::Duration;
//!
//! let client = AcApiClient::builder("192.168.1.1:9999", "secret")
//!     .timeout(Duration::from_secs(5))
//!     .localized_errors(false)
//!     .build()?;
//! ```
//!
//! # Error Handling
//!
//! All methods return `ApiResult<T>`, an alias for `Result<T, ApiError>`.
//! Appliance-side failures come back as [`ApiError::Remote`] with a message
//! suitable for display:
//!
//! ```rust,ignore
//! use sangfor_ac::api::{AcApiClient, ApiError};
//!
//! match client.user_get("alice").await {
//!     Ok(Some(user)) => println!("{} in {}", user.name, user.father_path),
//!     Ok(None) => println!("no such user"),
//!     Err(ApiError::Remote { code, message }) => println!("AC error {}: {}", code, message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! # Custom Requests
//!
//! Endpoints not covered by a method can go through [`AcApiClient::send`]
//! with a [`LogicalRequest`]; signing and envelope decoding are applied the
//! same way.

#[cfg(feature = "http")]
pub mod client;
pub mod envelope;
pub mod error;
pub mod request;
pub mod types;

// Re-export main types for convenience
#[cfg(feature = "http")]
pub use client::{AcApiClient, AcApiClientBuilder};
pub use envelope::{decode, Envelope, EnvelopeNormalizer, EMPTY_ARRAY_FIELDS};
pub use error::{ApiError, ApiResult};
pub use request::{LogicalRequest, RequestBuilder, SignedRequest, Verb, METHOD_PARAM};
pub use types::*;
