//! Monitored endpoint records.

use std::time::Duration;

use http::Uri;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::interval::{Interval, parse_interval};

/// Probe timeout applied when a record does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Interval tokens may be written unquoted (`interval: 30`).
#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalToken {
    Text(String),
    Secs(u64),
}

fn interval_token<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match IntervalToken::deserialize(deserializer)? {
        IntervalToken::Text(token) => token,
        IntervalToken::Secs(secs) => secs.to_string(),
    })
}

/// An endpoint record as written in the endpoints file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub name: String,
    pub url: String,
    #[serde(deserialize_with = "interval_token")]
    pub interval: String,
    /// Timeout in whole seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// A validated endpoint, immutable after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub url: Uri,
    pub interval: Interval,
    pub timeout: Duration,
}

impl Endpoint {
    /// Validate a raw record.
    pub fn from_spec(spec: &EndpointSpec) -> ConfigResult<Self> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        let url = parse_url(name, &spec.url)?;

        let interval =
            parse_interval(&spec.interval).map_err(|source| ConfigError::InvalidInterval {
                endpoint: name.to_string(),
                source,
            })?;

        if spec.timeout == 0 {
            return Err(ConfigError::InvalidTimeout {
                endpoint: name.to_string(),
            });
        }

        if spec.timeout > interval.as_secs() {
            warn!(
                endpoint = %name,
                timeout_secs = spec.timeout,
                interval_secs = interval.as_secs(),
                "timeout exceeds polling interval"
            );
        }

        Ok(Self {
            name: name.to_string(),
            url,
            interval,
            timeout: Duration::from_secs(spec.timeout),
        })
    }
}

fn parse_url(endpoint: &str, raw: &str) -> ConfigResult<Uri> {
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        endpoint: endpoint.to_string(),
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let uri: Uri = raw.trim().parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;

    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        Some(_) => return Err(invalid("scheme must be http or https")),
        None => return Err(invalid("url must be absolute")),
    }
    if uri.authority().is_none() {
        return Err(invalid("missing host"));
    }

    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, url: &str, interval: &str, timeout: u64) -> EndpointSpec {
        EndpointSpec {
            name: name.to_string(),
            url: url.to_string(),
            interval: interval.to_string(),
            timeout,
        }
    }

    #[test]
    fn valid_record() {
        let ep = Endpoint::from_spec(&spec("api", "http://localhost:8080/health", "30s", 3)).unwrap();
        assert_eq!(ep.name, "api");
        assert_eq!(ep.url.host(), Some("localhost"));
        assert_eq!(ep.url.path(), "/health");
        assert_eq!(ep.interval.as_secs(), 30);
        assert_eq!(ep.timeout, Duration::from_secs(3));
    }

    #[test]
    fn https_is_accepted() {
        let ep = Endpoint::from_spec(&spec("web", "https://example.com/healthz", "1m", 5)).unwrap();
        assert_eq!(ep.url.scheme_str(), Some("https"));
        assert_eq!(ep.interval.as_secs(), 60);
    }

    #[test]
    fn name_is_trimmed_and_required() {
        let ep = Endpoint::from_spec(&spec("  api ", "http://a/", "1s", 1)).unwrap();
        assert_eq!(ep.name, "api");

        let err = Endpoint::from_spec(&spec("   ", "http://a/", "1s", 1)).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyName));
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = Endpoint::from_spec(&spec("api", "/health", "1s", 1)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = Endpoint::from_spec(&spec("api", "ftp://host/health", "1s", 1)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn garbage_url_is_rejected() {
        let err = Endpoint::from_spec(&spec("api", "http://exa mple.com", "1s", 1)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn bad_interval_is_rejected() {
        let err = Endpoint::from_spec(&spec("api", "http://a/", "10x", 1)).unwrap_err();
        match err {
            ConfigError::InvalidInterval { endpoint, .. } => assert_eq!(endpoint, "api"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Endpoint::from_spec(&spec("api", "http://a/", "10s", 0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }

    #[test]
    fn timeout_longer_than_interval_is_allowed() {
        let ep = Endpoint::from_spec(&spec("slow", "http://a/", "1s", 10)).unwrap();
        assert_eq!(ep.timeout, Duration::from_secs(10));
        assert_eq!(ep.interval.as_secs(), 1);
    }
}
