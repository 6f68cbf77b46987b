//! Interval scheduler — one recurring trigger per interval group.
//!
//! The `IntervalScheduler`:
//! - Groups endpoints by interval and creates one `Trigger` per group
//! - Runs one timer loop per trigger, first firing one interval after start
//! - Spawns each admitted firing as its own task without waiting for it
//! - Drops firings that would exceed the per-trigger concurrency cap
//! - On shutdown, stops all timers and waits for in-flight firings

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use pulse_core::{Endpoint, group_by_interval};
use pulse_probe::{Prober, dispatch_group};

use crate::error::{SchedulerError, SchedulerResult};
use crate::trigger::Trigger;

/// Overlapping firings allowed per trigger unless configured otherwise.
pub const DEFAULT_MAX_INSTANCES: usize = 3;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum overlapping in-flight firings of the same trigger.
    pub max_concurrent_instances: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_instances: DEFAULT_MAX_INSTANCES,
        }
    }
}

/// Drives every trigger until shutdown.
pub struct IntervalScheduler {
    prober: Prober,
    triggers: Vec<Arc<Trigger>>,
}

impl IntervalScheduler {
    /// Build the scheduler. Groups `endpoints` by interval and creates
    /// one trigger per group; nothing runs until [`run`](Self::run).
    pub fn new(
        endpoints: Vec<Endpoint>,
        prober: Prober,
        config: SchedulerConfig,
    ) -> SchedulerResult<Self> {
        if endpoints.is_empty() {
            return Err(SchedulerError::NoEndpoints);
        }
        if config.max_concurrent_instances == 0 {
            return Err(SchedulerError::InvalidConcurrencyCap(
                config.max_concurrent_instances,
            ));
        }

        let triggers: Vec<Arc<Trigger>> = group_by_interval(endpoints)
            .into_iter()
            .map(|group| Arc::new(Trigger::new(group, config.max_concurrent_instances)))
            .collect();

        for trigger in &triggers {
            debug!(
                trigger = %trigger.name(),
                endpoints = trigger.group().len(),
                "trigger registered"
            );
        }

        Ok(Self { prober, triggers })
    }

    pub fn triggers(&self) -> &[Arc<Trigger>] {
        &self.triggers
    }

    /// Run all triggers until `shutdown` changes (or its sender is
    /// dropped), then wait for in-flight firings to finish.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) {
        info!(
            triggers = self.triggers.len(),
            endpoints = self.triggers.iter().map(|t| t.group().len()).sum::<usize>(),
            "scheduler started"
        );

        let start = Instant::now();
        let mut loops = JoinSet::new();
        for trigger in &self.triggers {
            loops.spawn(run_trigger(
                Arc::clone(trigger),
                self.prober.clone(),
                start,
                shutdown.clone(),
            ));
        }

        while let Some(joined) = loops.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "trigger loop failed");
            }
        }

        info!("scheduler stopped");
    }
}

/// Timer loop for a single trigger.
async fn run_trigger(
    trigger: Arc<Trigger>,
    prober: Prober,
    start: Instant,
    mut shutdown: watch::Receiver<bool>,
) {
    let period = trigger.interval().as_duration();
    // Missed ticks are replayed, never merged into one firing.
    let mut ticker = tokio::time::interval_at(start + period, period);
    let mut firings = JoinSet::new();

    let stopped = *shutdown.borrow_and_update();
    if !stopped {
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    reap(&trigger, &mut firings);
                    fire(&trigger, &prober, &mut firings);
                }
                _ = shutdown.changed() => break,
            }
        }
    }

    trigger.stop();
    if !firings.is_empty() {
        info!(
            trigger = %trigger.name(),
            in_flight = firings.len(),
            "waiting for in-flight firings"
        );
    }
    while let Some(joined) = firings.join_next().await {
        if let Err(e) = joined {
            error!(trigger = %trigger.name(), error = %e, "firing failed");
        }
    }
    debug!(
        trigger = %trigger.name(),
        fired = trigger.fired(),
        skipped = trigger.skipped(),
        "trigger stopped"
    );
}

fn fire(trigger: &Arc<Trigger>, prober: &Prober, firings: &mut JoinSet<()>) {
    let Some(guard) = trigger.try_acquire() else {
        warn!(
            trigger = %trigger.name(),
            in_flight = trigger.in_flight(),
            max_instances = trigger.max_instances(),
            "firing skipped: concurrency cap reached"
        );
        return;
    };

    debug!(
        trigger = %trigger.name(),
        in_flight = trigger.in_flight(),
        "trigger fired"
    );

    let group = Arc::clone(trigger.group());
    let prober = prober.clone();
    firings.spawn(async move {
        let _guard = guard;
        dispatch_group(&prober, &group).await;
    });
}

/// Collect finished firings so the set does not grow without bound.
fn reap(trigger: &Trigger, firings: &mut JoinSet<()>) {
    while let Some(joined) = firings.try_join_next() {
        if let Err(e) = joined {
            error!(trigger = %trigger.name(), error = %e, "firing failed");
        }
    }
}
