//! pulse-core — shared types for the Pulse endpoint monitor.
//!
//! Holds everything that is decided before the first probe is sent:
//! interval tokens, validated endpoint records, the interval grouping,
//! and loading the endpoints file.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod group;
pub mod interval;

pub use config::{EndpointsFile, load_endpoints};
pub use endpoint::{DEFAULT_TIMEOUT_SECS, Endpoint, EndpointSpec};
pub use error::{ConfigError, ConfigResult};
pub use group::{IntervalGroup, group_by_interval};
pub use interval::{Interval, IntervalError, MAX_INTERVAL_SECS, parse_interval};
