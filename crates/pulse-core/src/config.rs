//! Endpoints file parser.
//!
//! The file holds a single `endpoints` list and may be written in YAML
//! or TOML:
//!
//! ```yaml
//! endpoints:
//!   - name: api
//!     url: http://localhost:8080/health
//!     interval: 30s
//!     timeout: 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::endpoint::{Endpoint, EndpointSpec};
use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsFile {
    #[serde(default)]
    pub endpoints: Vec<EndpointSpec>,
}

impl EndpointsFile {
    /// Read an endpoints file, picking the format from its extension.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Validate every record. Fails on the first bad one.
    pub fn validate(&self) -> ConfigResult<Vec<Endpoint>> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        self.endpoints.iter().map(Endpoint::from_spec).collect()
    }
}

/// Load and validate the endpoints file at `path`.
pub fn load_endpoints(path: &Path) -> ConfigResult<Vec<Endpoint>> {
    let file = EndpointsFile::from_file(path)?;
    let endpoints = file.validate()?;
    debug!(path = %path.display(), count = endpoints.len(), "endpoints loaded");
    Ok(endpoints)
}
