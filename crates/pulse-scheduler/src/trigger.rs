//! Recurring triggers.
//!
//! A `Trigger` owns one interval group and an atomic count of its
//! in-flight firings. A firing that would push the count past the
//! concurrency cap is dropped, not queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use pulse_core::{Interval, IntervalGroup};

/// Lifecycle of a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Waiting for the next tick, nothing in flight.
    Idle,
    /// At least one firing is running.
    Firing,
    /// No further firings will be issued.
    Stopped,
}

/// One recurring schedule per interval group.
#[derive(Debug)]
pub struct Trigger {
    name: String,
    group: Arc<IntervalGroup>,
    max_instances: usize,
    in_flight: AtomicUsize,
    fired: AtomicU64,
    skipped: AtomicU64,
    stopped: AtomicBool,
}

impl Trigger {
    /// Create a trigger for `group` allowing at most `max_instances`
    /// overlapping firings.
    pub fn new(group: IntervalGroup, max_instances: usize) -> Self {
        Self {
            name: format!("health_check_{}", group.interval),
            group: Arc::new(group),
            max_instances,
            in_flight: AtomicUsize::new(0),
            fired: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Interval {
        self.group.interval
    }

    pub fn group(&self) -> &Arc<IntervalGroup> {
        &self.group
    }

    pub fn max_instances(&self) -> usize {
        self.max_instances
    }

    /// Claim a firing slot.
    ///
    /// Returns `None` when the trigger is stopped or the cap is reached;
    /// the latter counts as a skipped firing. The slot is released when
    /// the returned guard is dropped.
    pub fn try_acquire(self: &Arc<Self>) -> Option<FiringGuard> {
        if self.stopped.load(Ordering::Acquire) {
            return None;
        }

        let claimed = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_instances).then_some(n + 1)
            })
            .is_ok();

        if claimed {
            self.fired.fetch_add(1, Ordering::Relaxed);
            Some(FiringGuard {
                trigger: Arc::clone(self),
            })
        } else {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Stop issuing firings. In-flight firings are unaffected.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn state(&self) -> TriggerState {
        if self.stopped.load(Ordering::Acquire) {
            TriggerState::Stopped
        } else if self.in_flight() > 0 {
            TriggerState::Firing
        } else {
            TriggerState::Idle
        }
    }

    /// Firings currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Firings started since creation.
    pub fn fired(&self) -> u64 {
        self.fired.load(Ordering::Relaxed)
    }

    /// Firings dropped because the cap was reached.
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

/// Holds one in-flight slot of a trigger until dropped.
#[derive(Debug)]
pub struct FiringGuard {
    trigger: Arc<Trigger>,
}

impl FiringGuard {
    pub fn trigger(&self) -> &Arc<Trigger> {
        &self.trigger
    }
}

impl Drop for FiringGuard {
    fn drop(&mut self) {
        self.trigger.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
