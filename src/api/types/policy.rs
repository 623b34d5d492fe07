//! Policy types (`policy/netpolicy`, `policy/fluxpolicy`).

use serde::{Deserialize, Serialize};

/// Internet-access policy summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetPolicyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,
    /// Creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
    /// Enabled
    pub status: bool,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depict: Option<String>,
}

/// Who an internet-access policy applies to.
///
/// Every list here may arrive as `{}` when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetPolicyUserInfo {
    /// Organization units
    pub ou: Vec<String>,
    /// Domain users
    pub aduser: Vec<String>,
    /// Domain security groups
    pub adgroup: Vec<String>,
    /// Excluded domain users
    pub exc_aduser: Vec<String>,
    /// Domain attributes
    pub attribute: Vec<String>,
    /// User/group attributes
    pub user_attr_grp: Vec<String>,
    pub sourceip: Vec<String>,
    pub location: Vec<String>,
    pub terminal: Vec<String>,
    pub target_area: Vec<String>,
    /// Local users the policy applies to
    pub local: Option<String>,
}

/// Internet-access policy with its targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetPolicy {
    pub policy_info: NetPolicyInfo,
    pub user_info: NetPolicyUserInfo,
}

/// Flow-control channel.
///
/// Several fields listed by the vendor documentation (`is_default_child`,
/// `childrens`, `is_low_speed`, `target_users`, `ip_group`) are not what the
/// appliance actually returns and are left out until confirmed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FluxPolicy {
    /// Channel id
    pub id: String,
    /// Channel name
    pub name: String,
    /// Parent channel
    pub father_id: String,
    /// Target IP groups, comma separated
    #[serde(rename = "di", skip_serializing_if = "Option::is_none")]
    pub ip_group: Option<String>,
    /// Applicable objects (location/user/terminal...), comma separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Applicable applications, comma separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Schedule (e.g. all day)
    #[serde(rename = "time", skip_serializing_if = "Option::is_none")]
    pub active_time: Option<String>,
    pub status: bool,
    /// Guaranteed bandwidth `[up, down]`, `-1` for unlimited
    pub assured: Vec<String>,
    /// Maximum bandwidth `[up, down]`, `-1` for unlimited
    pub max: Vec<String>,
    /// Per-user bandwidth `[up, down]`, `-1` for unlimited
    pub single: Vec<String>,
}
