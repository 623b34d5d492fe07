//! Network constants for the appliance management API.

use crate::api::error::{ApiError, ApiResult};

/// Port the AC management API listens on when none is configured.
pub const DEFAULT_PORT: u16 = 9999;

/// Version prefix every endpoint path is resolved against.
pub const API_PREFIX: &str = "v1";

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

const HTTP_SCHEME: &str = "http://";

/// Build the API base URL (`http://host:port/v1/`) for an appliance address.
///
/// A bare host gets [`DEFAULT_PORT`] appended. Bracketed IPv6 literals are
/// supported (`[fe80::1]` or `[fe80::1]:9999`).
///
/// # Errors
///
/// Returns [`ApiError::InvalidParameter`] for an empty address, a scheme
/// other than `http://`, a path, an empty or non-numeric port, or an IPv6
/// literal without brackets.
pub fn base_url(address: &str) -> ApiResult<String> {
    let trimmed = address.trim().trim_end_matches('/');
    let host_port = match trimmed.find("://") {
        Some(_) => trimmed.strip_prefix(HTTP_SCHEME).ok_or_else(|| {
            invalid(address, "only the http:// scheme is supported")
        })?,
        None => trimmed,
    };

    if host_port.is_empty() {
        return Err(ApiError::InvalidParameter(
            "appliance address cannot be empty".to_string(),
        ));
    }
    if host_port.contains('/') {
        return Err(invalid(address, "address cannot carry a path"));
    }

    let (host, port) = split_host_port(address, host_port)?;
    Ok(format!(
        "http://{}:{}/{}/",
        host,
        port.unwrap_or(DEFAULT_PORT),
        API_PREFIX
    ))
}

fn split_host_port<'a>(address: &str, host_port: &'a str) -> ApiResult<(&'a str, Option<u16>)> {
    let (host, port) = if host_port.starts_with('[') {
        let end = host_port
            .find(']')
            .ok_or_else(|| invalid(address, "unterminated IPv6 literal"))?;
        let (host, rest) = host_port.split_at(end + 1);
        if host.len() == 2 {
            return Err(invalid(address, "empty IPv6 literal"));
        }
        match rest {
            "" => (host, None),
            _ => match rest.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None => return Err(invalid(address, "unexpected text after IPv6 literal")),
            },
        }
    } else {
        match host_port.split_once(':') {
            Some((_, rest)) if rest.contains(':') => {
                return Err(invalid(address, "IPv6 literals must be bracketed"))
            }
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    if host.is_empty() {
        return Err(invalid(address, "missing host"));
    }
    let port = port.map(|port| parse_port(address, port)).transpose()?;
    Ok((host, port))
}

fn parse_port(address: &str, port: &str) -> ApiResult<u16> {
    if port.is_empty() {
        return Err(invalid(address, "empty port"));
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid(address, "port must be a number in 1-65535")),
        Ok(port) => Ok(port),
    }
}

fn invalid(address: &str, reason: &str) -> ApiError {
    ApiError::InvalidParameter(format!("invalid appliance address {:?}: {}", address, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(address: &str) {
        match base_url(address) {
            Err(ApiError::InvalidParameter(_)) => {}
            other => panic!("expected {:?} to be rejected, got {:?}", address, other),
        }
    }

    #[test]
    fn test_base_url_with_port() {
        assert_eq!(base_url("192.168.1.1:8080").unwrap(), "http://192.168.1.1:8080/v1/");
    }

    #[test]
    fn test_base_url_default_port() {
        assert_eq!(base_url("192.168.1.1").unwrap(), "http://192.168.1.1:9999/v1/");
        assert_eq!(base_url("ac.local/").unwrap(), "http://ac.local:9999/v1/");
    }

    #[test]
    fn test_base_url_strips_scheme() {
        assert_eq!(base_url("http://10.0.0.1:9999").unwrap(), "http://10.0.0.1:9999/v1/");
        assert_eq!(base_url(" http://ac.local/ ").unwrap(), "http://ac.local:9999/v1/");
    }

    #[test]
    fn test_base_url_ipv6() {
        assert_eq!(base_url("[fe80::1]:9999").unwrap(), "http://[fe80::1]:9999/v1/");
        assert_eq!(base_url("[fe80::1]").unwrap(), "http://[fe80::1]:9999/v1/");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert_invalid("https://10.0.0.1:9999");
        assert_invalid("ftp://ac.local");
    }

    #[test]
    fn test_base_url_rejects_unbracketed_ipv6() {
        assert_invalid("fe80::1");
        assert_invalid("fe80::1:9999");
    }

    #[test]
    fn test_base_url_rejects_bad_ports() {
        assert_invalid("10.0.0.1:");
        assert_invalid("10.0.0.1:http");
        assert_invalid("10.0.0.1:70000");
        assert_invalid("10.0.0.1:0");
        assert_invalid("[fe80::1]:");
    }

    #[test]
    fn test_base_url_rejects_malformed() {
        assert_invalid("");
        assert_invalid("   ");
        assert_invalid("http://");
        assert_invalid(":9999");
        assert_invalid("ac.local/v1");
        assert_invalid("[fe80::1");
        assert_invalid("[]:9999");
    }
}
