//! AC management API client implementation.
//!
//! The [`AcApiClient`] signs each request, sends it, and decodes the response
//! envelope into a typed result. One method per appliance operation.
//!
//! # Example
//!
//! ```rust,ignore
//! use sangfor_ac::api::AcApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AcApiClient::new("192.168.1.1:9999", "YR9nQngmvhX&9BE83K")?;
//!
//!     let version = client.version().await?;
//!     println!("AC version {}", version);
//!
//!     let online = client.online_users(Default::default()).await?;
//!     println!("{} users online", online.count);
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use rand::RngCore;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::api::envelope::{self, EnvelopeNormalizer};
use crate::api::error::{ApiError, ApiResult};
use crate::api::request::{LogicalRequest, RequestBuilder, SignedRequest, Verb};
use crate::api::types::*;
use crate::auth::Signer;
use crate::config::AcConfig;
use crate::network::{self, DEFAULT_TIMEOUT_SECS};

// Status
const STATUS_VERSION: &str = "status/version";
const STATUS_ONLINE_USER: &str = "status/online-user";
const STATUS_SESSION_NUM: &str = "status/session-num";
const STATUS_INSIDE_LIB: &str = "status/insidelib";
const STATUS_LOG_NUM: &str = "status/log";
const STATUS_CPU_USAGE: &str = "status/cpu-usage";
const STATUS_MEM_USAGE: &str = "status/mem-usage";
const STATUS_DISK_USAGE: &str = "status/disk-usage";
const STATUS_SYS_TIME: &str = "status/sys-time";
const STATUS_THROUGHPUT: &str = "status/throughput";
const STATUS_USER_RANK: &str = "status/user-rank";
const STATUS_APP_RANK: &str = "status/app-rank";
const STATUS_BANDWIDTH_USAGE: &str = "status/bandwidth-usage";

// Users and groups
const USER: &str = "user";
const USER_NET_POLICY: &str = "user/netpolicy";
const USER_FLUX_POLICY: &str = "user/fluxpolicy";
const GROUP: &str = "group";
const GROUP_NET_POLICY: &str = "group/netpolicy";

// Policies
const NET_POLICY: &str = "policy/netpolicy";
const FLUX_POLICY: &str = "policy/fluxpolicy";

// Bindings. The IP/MAC search lives outside `bindinfo/` on the appliance.
const BIND_USER: &str = "bindinfo/user-bindinfo";
const BIND_IPMAC_SEARCH: &str = "ipmac-bindinfo";
const BIND_IPMAC: &str = "bindinfo/ipmac-bindinfo";

const ONLINE_USERS: &str = "online-users";

const TUNNEL_GET: &str = "GET";
const TUNNEL_PUT: &str = "PUT";
const TUNNEL_DELETE: &str = "DELETE";
const TUNNEL_VERIFY: &str = "verify";

/// Builder for configuring [`AcApiClient`].
#[derive(Debug, Clone)]
pub struct AcApiClientBuilder {
    address: String,
    secret: String,
    localized_errors: bool,
    timeout: Duration,
    normalizer: EnvelopeNormalizer,
    signer: Option<Signer>,
}

impl AcApiClientBuilder {
    /// Create a new builder for the appliance at `address` (`host[:port]`).
    pub fn new(address: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::from_config(AcConfig::new(address, secret))
    }

    /// Create a builder from an [`AcConfig`].
    pub fn from_config(config: AcConfig) -> Self {
        Self {
            address: config.address,
            secret: config.secret,
            localized_errors: config.localized_errors,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            normalizer: EnvelopeNormalizer::default(),
            signer: None,
        }
    }

    /// Ask the appliance for Chinese error messages (default `true`).
    pub fn localized_errors(mut self, enabled: bool) -> Self {
        self.localized_errors = enabled;
        self
    }

    /// Set the per-request timeout (default 20s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Replace the empty-array normalizer used by endpoints that need it.
    pub fn normalizer(mut self, normalizer: EnvelopeNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Use `rng` as the nonce source instead of an entropy-seeded `StdRng`.
    pub fn rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.signer = Some(Signer::with_rng(self.secret.clone(), rng));
        self
    }

    /// Build the client.
    ///
    /// Fails with [`ApiError::InvalidParameter`] when the address does not
    /// resolve to an `http://host:port` URL.
    pub fn build(self) -> ApiResult<AcApiClient> {
        let base_url = network::base_url(&self.address)?;
        reqwest::Url::parse(&base_url).map_err(|e| {
            ApiError::InvalidParameter(format!(
                "invalid appliance address {:?}: {}",
                self.address, e
            ))
        })?;

        let http_client = Client::builder().timeout(self.timeout).build()?;
        let signer = match self.signer {
            Some(signer) => signer,
            None => Signer::new(self.secret),
        };

        Ok(AcApiClient {
            http_client,
            requests: RequestBuilder::new(base_url, self.localized_errors),
            signer,
            normalizer: self.normalizer,
        })
    }
}

/// Sangfor AC management API client.
///
/// Requests are independent and unretried; any failure is returned to the
/// caller as-is.
#[derive(Debug, Clone)]
pub struct AcApiClient {
    http_client: Client,
    requests: RequestBuilder,
    signer: Signer,
    normalizer: EnvelopeNormalizer,
}

impl AcApiClient {
    /// Create a client with default settings (20s timeout, localized errors).
    ///
    /// # Errors
    ///
    /// Returns an error if the address is empty or the HTTP client cannot be
    /// initialized.
    pub fn new(address: impl Into<String>, secret: impl Into<String>) -> ApiResult<Self> {
        AcApiClientBuilder::new(address, secret).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(address: impl Into<String>, secret: impl Into<String>) -> AcApiClientBuilder {
        AcApiClientBuilder::new(address, secret)
    }

    /// Create a client from an [`AcConfig`].
    pub fn from_config(config: AcConfig) -> ApiResult<Self> {
        AcApiClientBuilder::from_config(config).build()
    }

    /// The API base URL (`http://host:port/v1/`).
    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    // =========================================================================
    // Core pipeline
    // =========================================================================

    /// Sign, send and decode a logical request.
    pub async fn send<T: DeserializeOwned>(&self, logical: LogicalRequest) -> ApiResult<T> {
        let signed = self.requests.build(&logical, &self.signer.sign())?;
        let body = self.execute(signed).await?;
        let normalizer = logical.normalize.then_some(&self.normalizer);

        envelope::decode(&body, normalizer).inspect_err(|e| {
            if let ApiError::Remote { code, message } = e {
                tracing::warn!(code, message = %message, path = %logical.path, "AC rejected request");
            }
        })
    }

    /// Send a built request and return the raw body.
    ///
    /// The HTTP status is not interpreted: the appliance reports failures in
    /// the envelope.
    pub async fn execute(&self, request: SignedRequest) -> ApiResult<Vec<u8>> {
        let mut builder = match request.verb {
            Verb::Get => self.http_client.get(&request.url),
            Verb::Post => self.http_client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, *value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // The query string may carry credentials (password verification).
        let endpoint = request.url.split('?').next().unwrap_or_default();
        tracing::debug!(method = request.verb.as_str(), url = endpoint, "Sending AC request");

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::trace!(
            status = %status,
            body = %String::from_utf8_lossy(&body),
            "AC response"
        );

        if body.is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        Ok(body.to_vec())
    }

    // =========================================================================
    // Status endpoints
    // =========================================================================

    /// Firmware version string.
    pub async fn version(&self) -> ApiResult<String> {
        self.send(LogicalRequest::get(STATUS_VERSION)).await
    }

    /// Number of online users.
    pub async fn online_user_count(&self) -> ApiResult<i64> {
        self.send(LogicalRequest::get(STATUS_ONLINE_USER)).await
    }

    /// Number of active sessions on the device.
    pub async fn session_num(&self) -> ApiResult<i64> {
        self.send(LogicalRequest::get(STATUS_SESSION_NUM)).await
    }

    /// Versions of the built-in libraries (virus, URL, application rules...).
    pub async fn inside_lib(&self) -> ApiResult<Vec<InsideLib>> {
        self.send(LogicalRequest::get(STATUS_INSIDE_LIB)).await
    }

    /// Blocked/recorded log counters.
    pub async fn log_num(&self) -> ApiResult<LogNum> {
        self.send(LogicalRequest::get(STATUS_LOG_NUM)).await
    }

    /// CPU usage in percent.
    pub async fn cpu_usage(&self) -> ApiResult<i64> {
        self.send(LogicalRequest::get(STATUS_CPU_USAGE)).await
    }

    /// Memory usage in percent.
    pub async fn mem_usage(&self) -> ApiResult<i64> {
        self.send(LogicalRequest::get(STATUS_MEM_USAGE)).await
    }

    /// Disk usage in percent.
    pub async fn disk_usage(&self) -> ApiResult<i64> {
        self.send(LogicalRequest::get(STATUS_DISK_USAGE)).await
    }

    /// Device clock, e.g. `2017-12-13 17:52:11`.
    pub async fn sys_time(&self) -> ApiResult<String> {
        self.send(LogicalRequest::get(STATUS_SYS_TIME)).await
    }

    /// Current up/down rate, all WAN interfaces unless filtered.
    pub async fn throughput(&self, filter: Option<ThroughputFilter>) -> ApiResult<Throughput> {
        let request = with_filter(LogicalRequest::post(STATUS_THROUGHPUT).tunnel(TUNNEL_GET), filter)?;
        self.send(request).await
    }

    /// Per-user traffic ranking.
    pub async fn user_rank(&self, filter: Option<UserRankFilter>) -> ApiResult<Vec<UserRank>> {
        let request = with_filter(LogicalRequest::post(STATUS_USER_RANK).tunnel(TUNNEL_GET), filter)?;
        self.send(request).await
    }

    /// Per-application traffic ranking.
    pub async fn app_rank(&self, filter: Option<AppRankFilter>) -> ApiResult<Vec<AppRank>> {
        let request = with_filter(LogicalRequest::post(STATUS_APP_RANK).tunnel(TUNNEL_GET), filter)?;
        self.send(request).await
    }

    /// Bandwidth usage in percent.
    pub async fn bandwidth_usage(&self) -> ApiResult<i64> {
        self.send(LogicalRequest::get(STATUS_BANDWIDTH_USAGE)).await
    }

    // =========================================================================
    // User endpoints
    // =========================================================================

    /// Create a user.
    ///
    /// Fails with [`ApiError::InvalidParameter`] before sending anything when
    /// `user.name` is empty.
    pub async fn user_add(&self, user: &UserAdd) -> ApiResult<String> {
        if user.name.trim().is_empty() {
            return Err(ApiError::InvalidParameter(
                "cannot add user without username".to_string(),
            ));
        }
        self.send(LogicalRequest::post(USER).json_body(user)?).await
    }

    /// Delete a user by name.
    pub async fn user_delete(&self, name: &str) -> ApiResult<String> {
        let request = LogicalRequest::post(USER)
            .tunnel(TUNNEL_DELETE)
            .field("name", name);
        self.send(request).await
    }

    /// Search users (at most 100 results).
    pub async fn user_search(&self, search: &UserSearch) -> ApiResult<Vec<UserDetail>> {
        let request = LogicalRequest::post(USER)
            .tunnel(TUNNEL_GET)
            .json_body(search)?
            .normalized();
        self.send(request).await
    }

    /// Look up a user by exact name.
    pub async fn user_get(&self, name: &str) -> ApiResult<Option<UserDetail>> {
        self.send(LogicalRequest::get(USER).query("name", name).normalized())
            .await
    }

    /// Add, remove or replace a user's internet-access policies.
    pub async fn user_net_policy_set(&self, set: &UserPolicySet) -> ApiResult<String> {
        self.send(LogicalRequest::post(USER_NET_POLICY).json_body(set)?)
            .await
    }

    /// Internet-access policies linked to a user.
    ///
    /// Unverified: the appliance has answered "request data format incorrect"
    /// for this shape; waiting on the vendor for the correct parameters.
    pub async fn user_net_policy_get(&self, user: &str) -> ApiResult<Vec<String>> {
        self.send(LogicalRequest::get(USER_NET_POLICY).query("user", user))
            .await
    }

    /// Add, remove or replace a user's flow-control policies.
    pub async fn user_flux_policy_set(&self, set: &UserPolicySet) -> ApiResult<String> {
        self.send(LogicalRequest::post(USER_FLUX_POLICY).json_body(set)?)
            .await
    }

    /// Flow-control policies linked to a user.
    ///
    /// Unverified: same request-format rejection as [`Self::user_net_policy_get`].
    pub async fn user_flux_policy_get(&self, user: &str) -> ApiResult<Vec<String>> {
        self.send(LogicalRequest::get(USER_FLUX_POLICY).query("user", user))
            .await
    }

    /// Check a local user's password. `Ok(())` means the appliance accepted it.
    ///
    /// Unverified: the vendor documentation for this call is inconsistent and
    /// the appliance appears to route it to the user lookup; the response
    /// payload is ignored.
    pub async fn user_verify_password(&self, name: &str, password: &str) -> ApiResult<()> {
        let request = LogicalRequest::get(USER)
            .tunnel(TUNNEL_VERIFY)
            .query("name", name)
            .query("password", password);
        let _: IgnoredAny = self.send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Group endpoints
    // =========================================================================

    /// Create a group. `path` starts with `/`, at most 15 levels deep, and
    /// cannot be under a domain group.
    pub async fn group_add(&self, path: &str, desc: Option<&str>) -> ApiResult<String> {
        let mut request = LogicalRequest::post(GROUP).field("path", path);
        if let Some(desc) = desc {
            request = request.field("desc", desc);
        }
        self.send(request).await
    }

    /// Delete a group.
    pub async fn group_delete(&self, path: &str) -> ApiResult<String> {
        let request = LogicalRequest::post(GROUP)
            .tunnel(TUNNEL_DELETE)
            .field("path", path);
        self.send(request).await
    }

    /// Update a group's description (the only mutable attribute).
    pub async fn group_update(&self, path: &str, desc: &str) -> ApiResult<String> {
        let request = LogicalRequest::post(GROUP)
            .tunnel(TUNNEL_PUT)
            .field("path", path)
            .field("desc", desc);
        self.send(request).await
    }

    /// Add, remove or replace a group's internet-access policies.
    pub async fn group_net_policy_set(&self, set: &GroupPolicySet) -> ApiResult<String> {
        self.send(LogicalRequest::post(GROUP_NET_POLICY).json_body(set)?)
            .await
    }

    /// Internet-access policies linked to a group.
    ///
    /// Unverified: the appliance has rejected this request format in testing.
    pub async fn group_net_policy_get(&self, path: &str) -> ApiResult<Vec<String>> {
        self.send(LogicalRequest::get(GROUP_NET_POLICY).query("path", path))
            .await
    }

    // =========================================================================
    // Policy endpoints
    // =========================================================================

    /// All internet-access policies configured on the device.
    pub async fn net_policies(&self) -> ApiResult<Vec<NetPolicy>> {
        self.send(LogicalRequest::get(NET_POLICY).normalized()).await
    }

    /// All flow-control channels configured on the device.
    pub async fn flux_policies(&self) -> ApiResult<Vec<FluxPolicy>> {
        self.send(LogicalRequest::get(FLUX_POLICY).normalized()).await
    }

    // =========================================================================
    // Binding endpoints
    // =========================================================================

    /// Search user ↔ IP/MAC bindings by user name, IP or MAC.
    ///
    /// Unverified: the appliance has rejected this request format in testing
    /// and the response shape is unknown, so only success or failure is
    /// reported.
    pub async fn bind_user_search(&self, value: &str) -> ApiResult<()> {
        let request = LogicalRequest::get(BIND_USER)
            .query("search", value)
            .normalized();
        let _: IgnoredAny = self.send(request).await?;
        Ok(())
    }

    /// Bind a user to an IP/MAC address.
    ///
    /// Unverified: the appliance has rejected this request format in testing.
    pub async fn bind_user_add(&self, bind: &BindUser) -> ApiResult<String> {
        self.send(LogicalRequest::post(BIND_USER).json_body(bind)?)
            .await
    }

    /// Remove the user binding for an address.
    ///
    /// Unverified: the appliance has rejected this request format in testing.
    pub async fn bind_user_delete(&self, addr: &str) -> ApiResult<String> {
        let request = LogicalRequest::post(BIND_USER)
            .tunnel(TUNNEL_DELETE)
            .field("addr", addr);
        self.send(request).await
    }

    /// Find the IP/MAC binding for an IP or MAC.
    ///
    /// The appliance reports a miss as an error envelope.
    pub async fn ipmac_search(&self, value: &str) -> ApiResult<BindIpMac> {
        let request = LogicalRequest::get(BIND_IPMAC_SEARCH)
            .query("search", value)
            .normalized();
        self.send(request).await
    }

    /// Add an IP/MAC binding. Both `ip` and `mac` are required.
    pub async fn ipmac_add(&self, bind: &BindIpMac) -> ApiResult<()> {
        if bind.ip.is_empty() || bind.mac.is_empty() {
            return Err(ApiError::InvalidParameter(
                "ip and mac are both required for an IP/MAC binding".to_string(),
            ));
        }
        let _: IgnoredAny = self
            .send(LogicalRequest::post(BIND_IPMAC).json_body(bind)?)
            .await?;
        Ok(())
    }

    /// Remove the IP/MAC binding of an IP.
    pub async fn ipmac_delete(&self, ip: &str) -> ApiResult<()> {
        let request = LogicalRequest::post(BIND_IPMAC)
            .tunnel(TUNNEL_DELETE)
            .field("ip", ip);
        let _: IgnoredAny = self.send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Online user endpoints
    // =========================================================================

    /// List online users (at most 100).
    pub async fn online_users(&self, query: OnlineUserQuery) -> ApiResult<OnlineUsers> {
        let request = LogicalRequest::post(ONLINE_USERS)
            .tunnel(TUNNEL_GET)
            .json_body(&query)?;
        self.send(request).await
    }

    /// Force the user at `ip` offline.
    pub async fn online_user_kick(&self, ip: &str) -> ApiResult<()> {
        let request = LogicalRequest::post(ONLINE_USERS)
            .tunnel(TUNNEL_DELETE)
            .field("ip", ip);
        let _: IgnoredAny = self.send(request).await?;
        Ok(())
    }

    /// Bring a user online at an address (single sign-on).
    pub async fn online_user_up(&self, user: &OnlineUserUp) -> ApiResult<()> {
        let _: IgnoredAny = self
            .send(LogicalRequest::post(ONLINE_USERS).json_body(user)?)
            .await?;
        Ok(())
    }
}

/// Attach `{"filter": ...}` to a ranking/throughput request when given.
fn with_filter<F: serde::Serialize>(
    request: LogicalRequest,
    filter: Option<F>,
) -> ApiResult<LogicalRequest> {
    match filter {
        Some(filter) => Ok(request.field("filter", serde_json::to_value(filter)?)),
        None => Ok(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_client_creation() {
        let client = AcApiClient::new("192.168.1.1", "secret").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.1:9999/v1/");
    }

    #[test]
    fn test_client_builder() {
        let client = AcApiClient::builder("10.0.0.1:8443", "secret")
            .timeout_secs(5)
            .localized_errors(false)
            .normalizer(EnvelopeNormalizer::disabled())
            .rng(StdRng::seed_from_u64(3))
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.1:8443/v1/");
    }

    #[test]
    fn test_empty_address_rejected() {
        let err = AcApiClient::new("  ", "secret").unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn test_malformed_address_rejected() {
        for address in ["https://10.0.0.1:9999", "fe80::1", "10.0.0.1:", "ac local"] {
            match AcApiClient::new(address, "secret") {
                Err(ApiError::InvalidParameter(_)) => {}
                other => panic!("expected {:?} to be rejected, got {:?}", address, other),
            }
        }
    }

    #[test]
    fn test_builder_default_timeout() {
        let builder = AcApiClient::builder("10.0.0.1", "secret");
        assert_eq!(builder.timeout, Duration::from_secs(20));
        assert!(builder.localized_errors);
    }

    #[test]
    fn test_from_config() {
        let mut config = AcConfig::new("ac.internal", "secret");
        config.localized_errors = false;
        let client = AcApiClient::from_config(config).unwrap();
        assert_eq!(client.base_url(), "http://ac.internal:9999/v1/");
    }

    #[test]
    fn test_with_filter() {
        let request = with_filter(
            LogicalRequest::post(STATUS_USER_RANK).tunnel(TUNNEL_GET),
            Some(UserRankFilter {
                top: Some(10),
                ..Default::default()
            }),
        )
        .unwrap();
        let body = request.body.unwrap();
        assert_eq!(body["filter"]["top"], 10);

        let request = with_filter::<UserRankFilter>(LogicalRequest::post(STATUS_USER_RANK), None).unwrap();
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_user_add_requires_name() {
        let client = AcApiClient::new("127.0.0.1:1", "secret").unwrap();
        let err = client.user_add(&UserAdd::new("")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_ipmac_add_requires_ip_and_mac() {
        let client = AcApiClient::new("127.0.0.1:1", "secret").unwrap();
        let err = client
            .ipmac_add(&BindIpMac::new("10.0.0.1", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }
}
