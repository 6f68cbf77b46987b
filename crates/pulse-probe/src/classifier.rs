//! Response classification.
//!
//! Turns an already-fetched HTTP response into a probe verdict. Only
//! status 200 counts as up. A JSON body may additionally carry a
//! `checks` map of sub-service name to status string, e.g.
//! `{"checks": {"postgres": "up", "redis": "down"}}`.

use std::collections::BTreeMap;

use thiserror::Error;

/// Content type that enables sub-service parsing. Matched exactly.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Sub-service status values treated as healthy (case-insensitive).
const OK_VALUES: [&str; 2] = ["up", "ok"];

/// Verdict for a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// The endpoint answered 200.
    Up,
    /// The endpoint answered with any other status.
    Down,
    /// The request failed at the transport level.
    ConnectionError,
    /// No response within the endpoint timeout.
    Timeout,
}

impl ProbeKind {
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeKind::Up)
    }
}

/// Status of one entry in a `checks` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Up,
    Down,
}

/// Sub-service name → status.
pub type SubServices = BTreeMap<String, ServiceStatus>;

/// The body claimed to be JSON but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed JSON body: {0}")]
pub struct MalformedBody(pub String);

/// Result of classifying a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ProbeKind,
    pub sub_services: Option<SubServices>,
    /// Set when the body looked like JSON but did not parse. Does not
    /// affect `kind`.
    pub body_error: Option<MalformedBody>,
}

/// Classify a response from its status, content type and body.
///
/// `body` is only inspected when `content_type` is exactly
/// `application/json`.
pub fn classify(status: u16, content_type: Option<&str>, body: &[u8]) -> Classification {
    let kind = classify_status(status);

    if !is_json(content_type) {
        return Classification {
            kind,
            sub_services: None,
            body_error: None,
        };
    }

    match parse_checks(body) {
        Ok(sub_services) => Classification {
            kind,
            sub_services,
            body_error: None,
        },
        Err(e) => Classification {
            kind,
            sub_services: None,
            body_error: Some(e),
        },
    }
}

pub fn classify_status(status: u16) -> ProbeKind {
    if status == 200 {
        ProbeKind::Up
    } else {
        ProbeKind::Down
    }
}

pub fn is_json(content_type: Option<&str>) -> bool {
    content_type == Some(JSON_CONTENT_TYPE)
}

/// Extract the `checks` map from a JSON body.
///
/// A missing `checks` field, or one that is not an object, yields
/// `Ok(None)`. Entries whose value is not a string count as down.
pub fn parse_checks(body: &[u8]) -> Result<Option<SubServices>, MalformedBody> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| MalformedBody(e.to_string()))?;

    let Some(checks) = value.get("checks").and_then(|c| c.as_object()) else {
        return Ok(None);
    };

    let services = checks
        .iter()
        .map(|(name, status)| {
            let status = match status.as_str() {
                Some(s) if OK_VALUES.iter().any(|ok| s.eq_ignore_ascii_case(ok)) => {
                    ServiceStatus::Up
                }
                _ => ServiceStatus::Down,
            };
            (name.clone(), status)
        })
        .collect();

    Ok(Some(services))
}
