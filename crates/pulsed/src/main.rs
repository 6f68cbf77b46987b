//! pulsed — the Pulse monitoring daemon.
//!
//! Single binary that wires the monitor together:
//! - Endpoints file (YAML or TOML)
//! - Shared HTTP client and alert sink
//! - Interval scheduler
//!
//! Runs until Ctrl-C or SIGTERM, then lets in-flight probes finish and
//! exits cleanly.
//!
//! # Usage
//!
//! ```text
//! pulsed --config endpoints.yaml --max-instances 3
//! YAML_FILE=endpoints.yaml pulsed
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};

use pulse_probe::{LogAlertSink, Prober, SharedAlertSink, SlackWebhookSink};
use pulse_scheduler::{DEFAULT_MAX_INSTANCES, IntervalScheduler, SchedulerConfig};

mod logging;

use logging::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "pulsed", about = "Pulse endpoint health monitor", version)]
struct Cli {
    /// Endpoints file (.yaml, .yml or .toml).
    #[arg(short, long, env = "YAML_FILE")]
    config: PathBuf,

    /// Maximum overlapping runs of the same interval group.
    #[arg(long, env = "MAX_INSTANCES", default_value_t = DEFAULT_MAX_INSTANCES)]
    max_instances: usize,

    /// Slack incoming webhook for alerts. Alerts are only logged when unset.
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    slack_webhook: Option<String>,

    /// Log output format.
    #[arg(long, env = "PULSE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!(config = %cli.config.display(), "pulse daemon starting");

    // ── Configuration ──────────────────────────────────────────

    let endpoints = pulse_core::load_endpoints(&cli.config)?;
    info!(endpoints = endpoints.len(), "endpoints loaded");

    // ── Probing ────────────────────────────────────────────────

    let alerts: SharedAlertSink = match &cli.slack_webhook {
        Some(url) => {
            info!("alerts will be posted to slack");
            Arc::new(SlackWebhookSink::new(url)?)
        }
        None => {
            info!("no webhook configured, alerts will be logged");
            Arc::new(LogAlertSink)
        }
    };
    let prober = Prober::new(pulse_probe::build_client()?, alerts);

    // ── Scheduler ──────────────────────────────────────────────

    let scheduler = IntervalScheduler::new(
        endpoints,
        prober,
        SchedulerConfig {
            max_concurrent_instances: cli.max_instances,
        },
    )?;
    for trigger in scheduler.triggers() {
        info!(
            trigger = %trigger.name(),
            interval_secs = trigger.interval().as_secs(),
            endpoints = trigger.group().len(),
            "trigger scheduled"
        );
    }

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal_handle = tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    scheduler.run(shutdown_rx).await;
    signal_handle.abort();

    info!("pulse daemon stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
