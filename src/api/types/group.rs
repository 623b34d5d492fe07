//! Group types (`group`, `group/netpolicy`).

use serde::{Deserialize, Serialize};

use super::PolicyOp;

/// Change the internet-access policies of a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPolicySet {
    pub opr: PolicyOp,
    /// Group path, starting with `/`
    pub group: String,
    /// Policy names
    pub policy: Vec<String>,
}
