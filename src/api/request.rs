//! Logical requests and the signed wire form they are built into.
//!
//! The appliance only understands GET and POST. Other verbs are tunneled with
//! a `_method` query parameter (`PUT`, `DELETE`, `GET` over POST, or the
//! custom `verify`). The builder never interprets that value.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::error::{ApiError, ApiResult};
use crate::auth::{SignedNonce, DIGEST_FIELD, RANDOM_FIELD};

/// Query parameter naming the tunneled verb.
pub const METHOD_PARAM: &str = "_method";

/// HTTP verb actually put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
        }
    }
}

/// A request as an endpoint binding describes it, before signing.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalRequest {
    /// Endpoint path relative to `/v1/` (e.g. `status/version`)
    pub path: String,
    /// Wire verb
    pub verb: Verb,
    /// Query parameters
    pub query: BTreeMap<String, String>,
    /// Body fields, sent only for POST
    pub body: Option<Map<String, Value>>,
    /// Run the empty-array normalization before decoding the response
    pub normalize: bool,
}

impl LogicalRequest {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb,
            query: BTreeMap::new(),
            body: None,
            normalize: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, path)
    }

    /// Add a query parameter, replacing any previous value for `key`.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Tunnel a logical verb through `_method`.
    pub fn tunnel(self, verb: impl Into<String>) -> Self {
        self.query(METHOD_PARAM, verb)
    }

    /// Set one body field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Merge the fields of a serializable record into the body.
    ///
    /// Fails with [`ApiError::InvalidParameter`] if `payload` does not
    /// serialize to a JSON object.
    pub fn json_body<T: Serialize + ?Sized>(mut self, payload: &T) -> ApiResult<Self> {
        match serde_json::to_value(payload)? {
            Value::Object(fields) => {
                self.body.get_or_insert_with(Map::new).extend(fields);
                Ok(self)
            }
            other => Err(ApiError::InvalidParameter(format!(
                "request payload must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Ask for the empty-array normalization on the response.
    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }

    /// The tunneled verb, if any.
    pub fn tunneled_verb(&self) -> Option<&str> {
        self.query.get(METHOD_PARAM).map(String::as_str)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A fully built, signed request ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    pub verb: Verb,
    /// Absolute URL including the query string
    pub url: String,
    /// Header name/value pairs
    pub headers: Vec<(&'static str, &'static str)>,
    /// Serialized JSON body (POST only)
    pub body: Option<String>,
}

impl SignedRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// Turns [`LogicalRequest`]s into [`SignedRequest`]s.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    localized_errors: bool,
}

impl RequestBuilder {
    /// `base_url` must end with `/` (see [`crate::network::base_url`]).
    pub fn new(base_url: impl Into<String>, localized_errors: bool) -> Self {
        Self {
            base_url: base_url.into(),
            localized_errors,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build and sign `logical` with `signed`.
    pub fn build(&self, logical: &LogicalRequest, signed: &SignedNonce) -> ApiResult<SignedRequest> {
        let mut url = format!("{}{}", self.base_url, logical.path.trim_start_matches('/'));

        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(logical.query.len() + 2);
        if let Some(verb) = logical.tunneled_verb() {
            pairs.push((METHOD_PARAM, verb));
        }
        pairs.extend(
            logical
                .query
                .iter()
                .filter(|(k, _)| k.as_str() != METHOD_PARAM)
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        if logical.verb == Verb::Get {
            pairs.push((RANDOM_FIELD, signed.random.as_str()));
            pairs.push((DIGEST_FIELD, signed.md5.as_str()));
        }
        append_query(&mut url, &pairs);

        let body = match logical.verb {
            Verb::Get => None,
            Verb::Post => {
                let mut fields = logical.body.clone().unwrap_or_default();
                fields.insert(RANDOM_FIELD.to_string(), Value::String(signed.random.clone()));
                fields.insert(DIGEST_FIELD.to_string(), Value::String(signed.md5.clone()));
                Some(serde_json::to_string(&fields)?)
            }
        };

        let mut headers = vec![("Content-Type", "application/json")];
        if self.localized_errors {
            headers.push(("Accept-Language", "zh-CN"));
        }

        Ok(SignedRequest {
            verb: logical.verb,
            url,
            headers,
            body,
        })
    }
}

fn append_query(url: &mut String, pairs: &[(&str, &str)]) {
    for (key, value) in pairs {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://10.0.0.1:9999/v1/";

    fn nonce(random: &str) -> SignedNonce {
        SignedNonce {
            random: random.to_string(),
            md5: crate::auth::digest("secret", random),
        }
    }

    fn query_pairs(url: &str) -> Vec<(String, String)> {
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
        query
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|p| {
                let (k, v) = p.split_once('=').unwrap();
                (
                    urlencoding::decode(k).unwrap().into_owned(),
                    urlencoding::decode(v).unwrap().into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn test_get_without_query_is_signed() {
        let builder = RequestBuilder::new(BASE, false);
        let built = builder
            .build(&LogicalRequest::get("status/version"), &nonce("123"))
            .unwrap();
        assert_eq!(
            built.url,
            format!(
                "{}status/version?random=123&md5={}",
                BASE,
                crate::auth::digest("secret", "123")
            )
        );
        assert!(built.body.is_none());
    }

    #[test]
    fn test_get_with_query_and_tunnel() {
        let builder = RequestBuilder::new(BASE, false);
        let logical = LogicalRequest::get("user")
            .query("name", "alice")
            .query("password", "p&ss w0rd")
            .tunnel("verify");
        let built = builder.build(&logical, &nonce("9")).unwrap();

        let pairs = query_pairs(&built.url);
        assert_eq!(pairs[0], ("_method".to_string(), "verify".to_string()));
        assert!(pairs.contains(&("name".to_string(), "alice".to_string())));
        assert!(pairs.contains(&("password".to_string(), "p&ss w0rd".to_string())));
        assert_eq!(pairs[pairs.len() - 2], ("random".to_string(), "9".to_string()));
        assert_eq!(pairs.last().unwrap().0, "md5");
        assert_eq!(pairs.iter().filter(|(k, _)| k == "_method").count(), 1);
        assert_eq!(pairs.len(), 5);
    }

    #[test]
    fn test_post_without_body_has_exactly_signing_fields() {
        let builder = RequestBuilder::new(BASE, false);
        let signed = nonce("18446744073709551615");
        let built = builder.build(&LogicalRequest::post("group"), &signed).unwrap();

        assert_eq!(built.url, format!("{}group", BASE));
        let body: Map<String, Value> = serde_json::from_str(built.body.as_deref().unwrap()).unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body["random"], Value::String(signed.random.clone()));
        assert_eq!(body["md5"], Value::String(signed.md5.clone()));
    }

    #[test]
    fn test_post_tunnel_goes_to_query_not_body() {
        let builder = RequestBuilder::new(BASE, true);
        let logical = LogicalRequest::post("online-users")
            .tunnel("DELETE")
            .field("ip", "10.1.1.1");
        let built = builder.build(&logical, &nonce("5")).unwrap();

        assert_eq!(built.url, format!("{}online-users?_method=DELETE", BASE));
        let body: Map<String, Value> = serde_json::from_str(built.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["ip"], "10.1.1.1");
        assert!(body.contains_key("random"));
        assert!(body.contains_key("md5"));
        assert!(!body.contains_key("_method"));
    }

    #[test]
    fn test_headers() {
        let logical = LogicalRequest::get("status/log");
        let plain = RequestBuilder::new(BASE, false)
            .build(&logical, &nonce("1"))
            .unwrap();
        assert_eq!(plain.header("content-type"), Some("application/json"));
        assert_eq!(plain.header("Accept-Language"), None);

        let localized = RequestBuilder::new(BASE, true)
            .build(&logical, &nonce("1"))
            .unwrap();
        assert_eq!(localized.header("accept-language"), Some("zh-CN"));
    }

    #[test]
    fn test_builds_differ_only_in_signature() {
        let builder = RequestBuilder::new(BASE, true);
        let logical = LogicalRequest::post("user")
            .tunnel("GET")
            .field("search_type", "user")
            .field("search_value", "bob");
        let a = builder.build(&logical, &nonce("1")).unwrap();
        let b = builder.build(&logical, &nonce("2")).unwrap();
        assert_eq!(a.url, b.url);
        assert_eq!(a.headers, b.headers);

        let mut body_a: Map<String, Value> = serde_json::from_str(a.body.as_deref().unwrap()).unwrap();
        let mut body_b: Map<String, Value> = serde_json::from_str(b.body.as_deref().unwrap()).unwrap();
        assert_ne!(body_a, body_b);
        for key in ["random", "md5"] {
            body_a.remove(key);
            body_b.remove(key);
        }
        assert_eq!(body_a, body_b);
    }

    #[test]
    fn test_json_body_rejects_non_object() {
        let err = LogicalRequest::post("user").json_body(&"just a string").unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn test_json_body_merges_fields() {
        #[derive(Serialize)]
        struct Payload {
            path: &'static str,
        }
        let logical = LogicalRequest::post("group")
            .field("desc", "lab")
            .json_body(&Payload { path: "/lab" })
            .unwrap();
        let body = logical.body.unwrap();
        assert_eq!(body["desc"], "lab");
        assert_eq!(body["path"], "/lab");
    }
}
