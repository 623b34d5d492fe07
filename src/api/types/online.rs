//! Online user types (`online-users`).

use serde::{Deserialize, Serialize};

/// Search condition for online users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineUserFilter {
    /// `user` (fuzzy name/group), `ip` or `mac`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<String>,
}

/// Online user listing request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineUserQuery {
    /// `all`, `frozen` or `active`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `all`, `pc`, `mobile`, `multi`, `iot`, `armarium` or `custom`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// No filter lists every user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<OnlineUserFilter>,
}

impl OnlineUserQuery {
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = Some(terminal.into());
        self
    }

    pub fn filter(mut self, filter_type: impl Into<String>, values: Vec<String>) -> Self {
        self.filter = Some(OnlineUserFilter {
            filter_type: Some(filter_type.into()),
            value: values,
        });
        self
    }
}

/// One logged-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnlineUser {
    pub name: String,
    pub show_name: String,
    pub father_path: String,
    pub group: String,
    pub ip: String,
    pub mac: String,
    pub terminal: i64,
    pub authway: i64,
    /// Unix timestamp
    pub login_time: i64,
    /// Seconds online
    pub online_time: i64,
}

/// Online user listing (at most 100 users).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnlineUsers {
    pub count: i64,
    pub users: Vec<OnlineUser>,
}

/// Single sign-on: bring a user online at an address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineUserUp {
    pub ip: String,
    pub name: String,
    pub show_name: String,
    pub group: String,
    pub mac: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_serialization() {
        let query = OnlineUserQuery::default()
            .status("active")
            .filter("ip", vec!["10.0.0.1".to_string()]);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"status": "active", "filter": {"type": "ip", "value": ["10.0.0.1"]}})
        );
        assert_eq!(serde_json::to_value(OnlineUserQuery::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_online_users_deserialize() {
        let json = r#"{"count":1,"users":[{"name":"alice","ip":"10.0.0.1","login_time":1620000000}]}"#;
        let online: OnlineUsers = serde_json::from_str(json).unwrap();
        assert_eq!(online.count, 1);
        assert_eq!(online.users[0].ip, "10.0.0.1");
        assert_eq!(online.users[0].login_time, 1620000000);
    }
}
