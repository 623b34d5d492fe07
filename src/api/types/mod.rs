//! Request and response types for the AC management API.
//!
//! Response records use `#[serde(default)]` throughout: the appliance omits
//! fields freely and zero values are what callers expect in that case.

pub mod bindinfo;
pub mod group;
pub mod online;
pub mod policy;
pub mod status;
pub mod user;

// Re-export all types for convenience
pub use bindinfo::*;
pub use group::*;
pub use online::*;
pub use policy::*;
pub use status::*;
pub use user::*;

/// How a policy set request modifies the existing assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyOp {
    /// Append the listed policies
    Add,
    /// Remove the listed policies
    Del,
    /// Replace the assignment with exactly the listed policies
    Modify,
}
