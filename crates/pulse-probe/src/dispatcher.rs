//! Group fan-out.
//!
//! Probes every member of an interval group concurrently and returns
//! once all of them have finished.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error};

use pulse_core::IntervalGroup;

use crate::prober::{ProbeOutcome, Prober};

/// Probe all members of `group` concurrently and wait for every probe.
///
/// Probes run as independent tasks: a slow or failing probe never
/// delays or cancels its siblings. Outcomes are returned in completion
/// order.
pub async fn dispatch_group(prober: &Prober, group: &IntervalGroup) -> Vec<ProbeOutcome> {
    let mut tasks = JoinSet::new();
    for member in &group.members {
        let prober = prober.clone();
        let endpoint = Arc::clone(member);
        tasks.spawn(async move { prober.probe(endpoint).await });
    }

    let mut outcomes = Vec::with_capacity(group.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                error!(interval = %group.interval, error = %e, "probe task failed");
            }
        }
    }

    debug!(
        interval = %group.interval,
        probes = outcomes.len(),
        up = outcomes.iter().filter(|o| o.kind.is_up()).count(),
        "group tick complete"
    );
    outcomes
}
