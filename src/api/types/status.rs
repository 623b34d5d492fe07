//! Device status types (`status/*` endpoints).

use serde::{Deserialize, Serialize};

/// Built-in signature library (virus, URL, application, audit rules, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsideLib {
    /// Library name
    pub name: String,
    /// Library kind (`kav`, `url`, `up`, `contchk`, `trace`)
    #[serde(rename = "type")]
    pub lib_type: String,
    /// Installed version
    pub current: String,
    /// Latest available version
    pub new: String,
    /// Upgrade service expiry
    pub expire: String,
    /// Automatic upgrade enabled
    pub enable: bool,
    /// 1 if the library has expired
    pub is_expired: i32,
}

impl InsideLib {
    pub fn expired(&self) -> bool {
        self.is_expired != 0
    }
}

/// Log counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogNum {
    /// Blocked-event log count
    pub block: i64,
    /// Recorded-event log count
    pub record: i64,
}

/// Filter for [`Throughput`] queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThroughputFilter {
    /// `bits` or `bytes`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Interface name; all WAN interfaces when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

impl ThroughputFilter {
    pub fn in_bits(mut self) -> Self {
        self.unit = Some("bits".to_string());
        self
    }

    pub fn in_bytes(mut self) -> Self {
        self.unit = Some("bytes".to_string());
        self
    }

    pub fn interface(mut self, name: impl Into<String>) -> Self {
        self.interface = Some(name.into());
        self
    }
}

/// Current upstream/downstream rate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Throughput {
    pub recv: i64,
    pub send: i64,
    /// `bits` or `bytes`
    pub unit: String,
}

/// Filter for per-user traffic ranking.
///
/// Only one of `groups`, `users`, `ips` takes effect; the appliance picks them
/// in that priority order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRankFilter {
    /// Top-N size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    /// Line number (`0` for all lines)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    /// Group paths (starting with `/`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    /// Single IPs only, no ranges
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ips: Vec<String>,
}

/// Per-application traffic of one ranked user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAppTraffic {
    pub id: i64,
    pub app: String,
    pub up: i64,
    pub down: i64,
    pub total: i64,
    pub percent: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRankDetail {
    pub data: Vec<UserAppTraffic>,
}

/// One row of the per-user traffic ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRank {
    pub id: i64,
    pub name: String,
    pub group: String,
    pub ip: String,
    /// Upstream bytes
    pub up: i64,
    /// Downstream bytes
    pub down: i64,
    pub total: i64,
    pub session: i64,
    /// `false` when the user is frozen
    pub status: bool,
    pub detail: Option<UserRankDetail>,
}

/// Filter for per-application traffic ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppRankFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppUserTraffic {
    pub user: String,
    pub grp: String,
    pub ip: String,
    pub up: i64,
    pub down: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppUserData {
    pub data: Vec<AppUserTraffic>,
    pub count: i64,
}

/// One row of the per-application traffic ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppRank {
    pub app: String,
    pub line: i64,
    pub line_name: String,
    pub up: i64,
    pub down: i64,
    pub total: i64,
    pub rate: i64,
    pub session: i64,
    pub user_data: Option<AppUserData>,
}
