//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::interval::IntervalError;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that prevent the monitor from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported endpoints file format: {0} (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("endpoint name must not be empty")]
    EmptyName,

    #[error("endpoint {endpoint}: invalid url {url:?}: {reason}")]
    InvalidUrl {
        endpoint: String,
        url: String,
        reason: String,
    },

    #[error("endpoint {endpoint}: {source}")]
    InvalidInterval {
        endpoint: String,
        #[source]
        source: IntervalError,
    },

    #[error("endpoint {endpoint}: timeout must be at least 1 second")]
    InvalidTimeout { endpoint: String },
}
