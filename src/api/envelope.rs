//! Response envelope decoding.
//!
//! Every AC response is wrapped as `{"code": int, "message": string, "data": any}`.
//! `code == 0` is the only success value; anything else is an appliance error
//! whose `message` is shown to the user and whose `data` is ignored.
//!
//! Decoding runs in two passes:
//!
//! 1. [`EnvelopeNormalizer`] rewrites `"<field>":{}` to `"<field>":[]` for a
//!    known set of array fields the appliance serializes as `{}` when empty.
//! 2. [`decode`] parses the envelope, maps `code != 0` to
//!    [`ApiError::Remote`], and decodes `data` into the caller's type.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};

/// Array-typed fields the appliance emits as `{}` when they are empty.
pub const EMPTY_ARRAY_FIELDS: &[&str] = &[
    "bind_cfg",
    "ipmac",
    "ou",
    "aduser",
    "adgroup",
    "exc_aduser",
    "attribute",
    "user_attr_grp",
    "sourceip",
    "location",
    "terminal",
    "target_area",
    "value",
];

/// Raw `{code, message, data}` wrapper, before `data` is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// 0 on success
    pub code: i64,
    /// Human-readable status, localized per `Accept-Language`
    #[serde(default)]
    pub message: String,
    /// Endpoint-specific payload; `null` when absent
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Parse an envelope from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> ApiResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Whether the appliance reported success.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Map the envelope to `data` decoded as `T`, or to [`ApiError::Remote`].
    pub fn into_data<T: DeserializeOwned>(self) -> ApiResult<T> {
        if !self.is_success() {
            return Err(ApiError::Remote {
                code: self.code,
                message: self.message,
            });
        }
        Ok(serde_json::from_value(self.data)?)
    }
}

/// Textual `{}` → `[]` rewrite for known array fields.
///
/// The rewrite only touches exact `"<field>":{}` substrings, so it is safe on
/// any well-formed response and idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeNormalizer {
    patterns: Vec<String>,
}

impl Default for EnvelopeNormalizer {
    fn default() -> Self {
        Self::from_fields(EMPTY_ARRAY_FIELDS.iter().copied())
    }
}

impl EnvelopeNormalizer {
    /// A normalizer covering `fields`.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalizer = Self::disabled();
        for field in fields {
            normalizer = normalizer.with_field(field.as_ref());
        }
        normalizer
    }

    /// A normalizer that leaves every response untouched.
    pub fn disabled() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Add another field to the rewrite set.
    pub fn with_field(mut self, field: &str) -> Self {
        let pattern = format!("\"{}\":{{}}", field);
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        self
    }

    /// Whether any field is covered.
    pub fn is_enabled(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Rewrite every `"<field>":{}` into `"<field>":[]`.
    ///
    /// Borrows the input unchanged when nothing matches.
    pub fn normalize<'a>(&self, bytes: &'a [u8]) -> Cow<'a, [u8]> {
        let mut out: Cow<'a, [u8]> = Cow::Borrowed(bytes);
        for pattern in &self.patterns {
            let pattern = pattern.as_bytes();
            let mut start = 0;
            while let Some(pos) = find(&out[start..], pattern) {
                let end = start + pos + pattern.len();
                // Same-length replacement: overwrite the trailing `{}`.
                let buf = out.to_mut();
                buf[end - 2] = b'[';
                buf[end - 1] = b']';
                start = end;
            }
        }
        out
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Decode a response body into `T`.
///
/// A zero-length body is rejected with [`ApiError::EmptyResponse`] before any
/// parsing. When `normalizer` is given it runs before the structural decode.
pub fn decode<T: DeserializeOwned>(
    bytes: &[u8],
    normalizer: Option<&EnvelopeNormalizer>,
) -> ApiResult<T> {
    if bytes.is_empty() {
        return Err(ApiError::EmptyResponse);
    }
    let bytes = match normalizer {
        Some(n) => n.normalize(bytes),
        None => Cow::Borrowed(bytes),
    };
    Envelope::from_slice(&bytes)?.into_data()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IgnoredAny;

    #[derive(Debug, Deserialize)]
    struct Record {
        bind_cfg: Vec<String>,
        name: String,
    }

    #[test]
    fn test_decode_string_data() {
        let body = br#"{"code":0,"message":"","data":"v1.2.3"}"#;
        let version: String = decode(body, None).unwrap();
        assert_eq!(version, "v1.2.3");
    }

    #[test]
    fn test_decode_number_data() {
        let body = br#"{"code":0,"message":"","data":37}"#;
        let usage: u32 = decode(body, None).unwrap();
        assert_eq!(usage, 37);
    }

    #[test]
    fn test_remote_error_regardless_of_shape() {
        let body = br#"{"code":1,"message":"No data in body","data":null}"#;

        let as_string = decode::<String>(body, None).unwrap_err();
        assert!(matches!(
            as_string,
            ApiError::Remote { code: 1, ref message } if message == "No data in body"
        ));

        let as_list = decode::<Vec<Record>>(body, None).unwrap_err();
        assert!(matches!(as_list, ApiError::Remote { code: 1, .. }));
    }

    #[test]
    fn test_remote_error_ignores_garbage_data() {
        let body = br#"{"code":3,"message":"bad","data":{"unexpected":true}}"#;
        let err = decode::<Vec<String>>(body, None).unwrap_err();
        assert_eq!(err.remote_code(), Some(3));
    }

    #[test]
    fn test_empty_body() {
        let err = decode::<String>(b"", Some(&EnvelopeNormalizer::default())).unwrap_err();
        assert!(matches!(err, ApiError::EmptyResponse));
    }

    #[test]
    fn test_malformed_json() {
        let err = decode::<String>(b"<html>502</html>", None).unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));
    }

    #[test]
    fn test_wrong_shape_is_decode_error() {
        let body = br#"{"code":0,"message":"","data":"text"}"#;
        let err = decode::<Vec<String>>(body, None).unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));
    }

    #[test]
    fn test_missing_data_into_option_and_unit() {
        let body = br#"{"code":0,"message":"ok"}"#;
        let none: Option<Record> = decode(body, None).unwrap();
        assert!(none.is_none());
        let _: () = decode(body, None).unwrap();
        let _: IgnoredAny = decode(body, None).unwrap();
    }

    #[test]
    fn test_empty_object_array_field_is_normalized() {
        let body = br#"{"code":0,"message":"","data":{"bind_cfg":{},"name":"x"}}"#;
        let record: Record = decode(body, Some(&EnvelopeNormalizer::default())).unwrap();
        assert!(record.bind_cfg.is_empty());
        assert_eq!(record.name, "x");
    }

    #[test]
    fn test_without_normalizer_empty_object_fails() {
        let body = br#"{"code":0,"message":"","data":{"bind_cfg":{},"name":"x"}}"#;
        assert!(decode::<Record>(body, None).is_err());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = EnvelopeNormalizer::default();
        let body = br#"{"data":[{"ou":{},"aduser":{},"local":"x","value":{},"terminal":{}}]}"#;
        let once = normalizer.normalize(body).into_owned();
        let twice = normalizer.normalize(&once).into_owned();
        assert_eq!(once, twice);
        assert_eq!(
            once,
            br#"{"data":[{"ou":[],"aduser":[],"local":"x","value":[],"terminal":[]}]}"#.to_vec()
        );
    }

    #[test]
    fn test_normalize_leaves_other_fields() {
        let normalizer = EnvelopeNormalizer::default();
        let body = br#"{"custom_cfg":{},"xvalue":{},"ipmac":{"a":1}}"#;
        let out = normalizer.normalize(body);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, &body[..]);
    }

    #[test]
    fn test_disabled_and_extended() {
        let body = br#"{"members":{}}"#;
        assert_eq!(&*EnvelopeNormalizer::disabled().normalize(body), &body[..]);
        assert!(!EnvelopeNormalizer::disabled().is_enabled());

        let extended = EnvelopeNormalizer::disabled().with_field("members");
        assert_eq!(&*extended.normalize(body), br#"{"members":[]}"#);
    }
}
