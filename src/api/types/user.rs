//! User types (`user`, `user/netpolicy`, `user/fluxpolicy`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::policy::NetPolicyInfo;
use super::PolicyOp;

/// Local password settings for a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelfPassword {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Force a password change on first login
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub modify_once: bool,
}

/// One IP/MAC binding attached to a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserBinding {
    /// e.g. `192.168.1.2`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// e.g. `ac-ed-ee-ee-ee-ee`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Binding expiry date (e.g. `2019-10-31`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_time: Option<String>,
    /// `noauth`, `loginlimit` or `noauth_and_loginlimit`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindgoal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// Shared-account settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonUser {
    /// Several people may log in with this account at once
    pub enable: bool,
    /// The account may change its local password
    pub allow_change: bool,
}

/// Payload for creating a user. `name` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAdd {
    pub name: String,
    /// Parent group path, starting with `/` (not a domain group)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_name: Option<String>,
    /// `YY-MM-dd hh:mm:ss`; never expires when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable: bool,
    /// Show a logout window after password authentication
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub logout: bool,
    /// Allowed login addresses (IP, IP range, or MAC)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub limit_ipmac: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_pass: Option<SelfPassword>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bind_cfg: Vec<UserBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_user: Option<CommonUser>,
    /// Custom attribute key/value pairs
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub custom_cfg: HashMap<String, String>,
}

impl UserAdd {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enable: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPassStatus {
    pub enable: bool,
    pub modify_once: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitIpMac {
    pub enable: bool,
    pub ipmac: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpireTime {
    pub enable: bool,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Full user record returned by lookups and searches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDetail {
    pub name: String,
    pub show_name: String,
    pub desc: String,
    /// Group the user belongs to
    pub father_path: String,
    /// Creator
    pub create: String,
    /// Created by authentication or automatic sync
    pub create_flag: bool,
    pub enable: bool,
    pub logout: bool,
    /// IP/MAC bindings
    pub bind_cfg: Vec<String>,
    pub custom_cfg: HashMap<String, String>,
    /// Policies linked to the user
    pub policy: Vec<NetPolicyInfo>,
    pub self_pass: SelfPassStatus,
    pub limit_ipmac: LimitIpMac,
    pub common_user: CommonUser,
    pub expire_time: ExpireTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpireRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Extra search constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSearchExtend {
    /// Restrict to this group; `/` by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_path: Option<String>,
    /// A single custom attribute to match
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub custom_cfg: HashMap<String, String>,
    /// `all`, `enabled` or `disabled`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<String>,
    /// Only accounts shared by several people
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<ExpireRange>,
}

/// User search request. The appliance returns at most 100 users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSearch {
    /// `user`, `ip` or `mac`
    pub search_type: String,
    /// Name (fuzzy), `{"start", "end"}` IP range, or MAC
    pub search_value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extend: Option<UserSearchExtend>,
}

impl UserSearch {
    /// Fuzzy search by user name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            search_type: "user".to_string(),
            search_value: Value::String(name.into()),
            extend: None,
        }
    }

    /// Search users whose IP falls in `start..=end`.
    pub fn by_ip_range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            search_type: "ip".to_string(),
            search_value: json!({ "start": start.into(), "end": end.into() }),
            extend: None,
        }
    }

    /// Search by bound MAC address.
    pub fn by_mac(mac: impl Into<String>) -> Self {
        Self {
            search_type: "mac".to_string(),
            search_value: Value::String(mac.into()),
            extend: None,
        }
    }

    pub fn with_extend(mut self, extend: UserSearchExtend) -> Self {
        self.extend = Some(extend);
        self
    }
}

/// Change the internet-access or flow-control policies of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPolicySet {
    pub opr: PolicyOp,
    pub user: String,
    /// Policy names
    pub policy: Vec<String>,
}
