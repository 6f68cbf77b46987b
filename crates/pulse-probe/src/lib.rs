//! pulse-probe — HTTP probing for the Pulse endpoint monitor.
//!
//! Executes health probes, classifies responses, fans probes out across
//! an interval group, and routes failures to an alert sink.
//!
//! # Architecture
//!
//! ```text
//! dispatch_group(IntervalGroup)
//!   └── one task per member
//!       └── Prober::probe(Endpoint)
//!           ├── GET over the shared ProbeClient (bounded by timeout)
//!           ├── classify() → ProbeKind + optional sub-services
//!           └── AlertSink::notify() on connection error, timeout, non-200
//! ```
//!
//! # Alert policy
//!
//! A probe raises at most one alert. Sub-service entries reported as
//! down inside a `checks` map are logged at error level but do not
//! alert on their own; the endpoint's own verdict comes only from its
//! HTTP status.

pub mod alert;
pub mod classifier;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod prober;

pub use alert::{AlertSink, LogAlertSink, SharedAlertSink, SlackWebhookSink};
pub use classifier::{Classification, MalformedBody, ProbeKind, ServiceStatus, SubServices, classify};
pub use client::{ProbeClient, build_client};
pub use dispatcher::dispatch_group;
pub use error::{ProbeError, ProbeResult};
pub use prober::{ProbeOutcome, Prober};
