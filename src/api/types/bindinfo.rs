//! User and IP/MAC binding types (`bindinfo/*`, `ipmac-bindinfo`).

use serde::{Deserialize, Serialize};

/// Kind of address a user binding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddrType {
    Ip,
    Mac,
    Ipmac,
}

/// Authentication exemption for a bound address.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NoAuth {
    pub enable: bool,
    /// Unix timestamp; 0 never expires
    pub expire_time: i64,
}

/// User ↔ address binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindUser {
    pub name: String,
    pub enable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_type: Option<AddrType>,
    /// `192.168.1.1`, `ff-ff-ff-ff-ff-ff`, or `192.168.1.1+ff-ff-ff-ff-ff-ff`
    /// depending on `addr_type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
    /// Restrict logins to the bound address
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub limitlogon: bool,
    pub noauth: NoAuth,
}

/// IP ↔ MAC binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindIpMac {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mac: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub desc: String,
}

impl BindIpMac {
    pub fn new(ip: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            mac: mac.into(),
            desc: String::new(),
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }
}
