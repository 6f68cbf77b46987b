//! pulse-scheduler — interval scheduling for the Pulse endpoint monitor.
//!
//! Turns a validated endpoint list into one recurring trigger per
//! distinct polling interval and drives them until shutdown. The
//! scheduler:
//!
//! - Registers one `Trigger` per interval group at startup
//! - Fires each trigger at a fixed period, never coalescing missed ticks
//! - Caps overlapping firings of the same trigger (default 3); excess
//!   firings are dropped and logged, never alerted
//! - Stops all timers on shutdown and lets in-flight probes finish
//!
//! # Architecture
//!
//! ```text
//! IntervalScheduler
//!   └── per-trigger timer loop
//!       ├── Trigger::try_acquire() (atomic in-flight counter)
//!       └── spawned firing → dispatch_group(IntervalGroup)
//! ```

pub mod error;
pub mod scheduler;
pub mod trigger;

pub use error::{SchedulerError, SchedulerResult};
pub use scheduler::{DEFAULT_MAX_INSTANCES, IntervalScheduler, SchedulerConfig};
pub use trigger::{FiringGuard, Trigger, TriggerState};
