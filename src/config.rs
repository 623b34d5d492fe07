//! Client configuration.

use std::env;

use serde::{Deserialize, Serialize};

/// Environment variable holding the appliance address (`host[:port]`).
pub const ENV_ADDR: &str = "SANGFOR_AC_ADDR";
/// Environment variable holding the shared API secret.
pub const ENV_SECRET: &str = "SANGFOR_AC_SECRET";
/// Environment variable selecting localized (zh-CN) error messages.
pub const ENV_LANG_CN: &str = "SANGFOR_AC_LANG_CN";

/// Connection settings for one appliance.
///
/// Can be embedded in an application's own config file:
///
/// ```toml
/// [ac]
/// address = "192.168.1.1:9999"
/// secret = "YR9nQngmvhX&9BE83K"
/// localized_errors = false
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcConfig {
    /// `host[:port]`; port defaults to 9999
    pub address: String,
    /// Secret configured on the appliance for API access
    pub secret: String,
    /// Ask for error messages in Chinese (`Accept-Language: zh-CN`)
    #[serde(default = "default_localized_errors")]
    pub localized_errors: bool,
}

fn default_localized_errors() -> bool {
    true
}

impl AcConfig {
    pub fn new(address: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            secret: secret.into(),
            localized_errors: default_localized_errors(),
        }
    }

    /// Read the configuration from `SANGFOR_AC_ADDR`, `SANGFOR_AC_SECRET` and
    /// the optional `SANGFOR_AC_LANG_CN` (`0`/`false`/`no` disables).
    ///
    /// Returns `None` when the address or secret is missing.
    pub fn from_env() -> Option<Self> {
        let address = env::var(ENV_ADDR).ok().filter(|v| !v.trim().is_empty())?;
        let secret = env::var(ENV_SECRET).ok()?;
        let localized_errors = env::var(ENV_LANG_CN)
            .map(|v| parse_flag(&v))
            .unwrap_or_else(|_| default_localized_errors());
        Some(Self {
            address,
            secret,
            localized_errors,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

impl std::fmt::Debug for AcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcConfig")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .field("localized_errors", &self.localized_errors)
            .finish()
    }
}
