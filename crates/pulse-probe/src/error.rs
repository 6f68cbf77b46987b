//! Probe setup errors.
//!
//! Failures of individual probes are not errors; they are reported as a
//! [`ProbeKind`](crate::ProbeKind). These cover building the shared
//! client and alert sinks.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to configure TLS: {0}")]
    Tls(#[from] rustls::Error),

    #[error("invalid webhook url {url:?}: {reason}")]
    InvalidWebhook { url: String, reason: String },
}

pub type ProbeResult<T> = Result<T, ProbeError>;
