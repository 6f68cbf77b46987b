//! Scheduler timing tests against an in-process HTTP server.
//!
//! Intervals are whole seconds, so these run in real time.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tokio::sync::watch;

use pulse_core::{Endpoint, Interval};
use pulse_probe::{LogAlertSink, Prober, build_client};
use pulse_scheduler::{IntervalScheduler, SchedulerConfig, TriggerState};

#[derive(Clone, Default)]
struct Hits {
    fast: Arc<AtomicUsize>,
    other: Arc<AtomicUsize>,
    slow: Arc<AtomicUsize>,
}

async fn start_server(hits: Hits) -> SocketAddr {
    let fast = hits.fast.clone();
    let other = hits.other.clone();
    let slow = hits.slow.clone();

    let router = Router::new()
        .route(
            "/fast",
            get(move || async move {
                fast.fetch_add(1, Ordering::SeqCst);
                "ok"
            }),
        )
        .route(
            "/other",
            get(move || async move {
                other.fetch_add(1, Ordering::SeqCst);
                "ok"
            }),
        )
        .route(
            "/slow",
            get(move || async move {
                slow.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2800)).await;
                "ok"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn endpoint(addr: SocketAddr, path: &str, interval_secs: u64, timeout_secs: u64) -> Endpoint {
    Endpoint {
        name: path.to_string(),
        url: format!("http://{addr}/{path}").parse().unwrap(),
        interval: Interval::from_secs(interval_secs).unwrap(),
        timeout: Duration::from_secs(timeout_secs),
    }
}

fn scheduler(endpoints: Vec<Endpoint>, cap: usize) -> Arc<IntervalScheduler> {
    let prober = Prober::new(build_client().unwrap(), Arc::new(LogAlertSink));
    Arc::new(
        IntervalScheduler::new(
            endpoints,
            prober,
            SchedulerConfig {
                max_concurrent_instances: cap,
            },
        )
        .unwrap(),
    )
}

fn spawn_run(
    scheduler: &Arc<IntervalScheduler>,
) -> (watch::Sender<bool>, tokio::task::JoinHandle<()>) {
    let (tx, rx) = watch::channel(false);
    let scheduler = Arc::clone(scheduler);
    let handle = tokio::spawn(async move { scheduler.run(rx).await });
    (tx, handle)
}

#[tokio::test]
async fn fires_every_interval_after_the_first_period() {
    let hits = Hits::default();
    let addr = start_server(hits.clone()).await;
    let scheduler = scheduler(vec![endpoint(addr, "fast", 1, 1)], 3);
    let (tx, handle) = spawn_run(&scheduler);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(hits.fast.load(Ordering::SeqCst), 0, "first firing waits one interval");

    tokio::time::sleep(Duration::from_millis(2000)).await;
    let count = hits.fast.load(Ordering::SeqCst);
    assert!((2..=3).contains(&count), "expected ~2 firings, got {count}");

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(3), handle)
        .await
        .expect("scheduler should stop")
        .unwrap();

    let trigger = &scheduler.triggers()[0];
    assert_eq!(trigger.state(), TriggerState::Stopped);
    assert_eq!(trigger.skipped(), 0);
}

#[tokio::test]
async fn groups_fire_independently() {
    let hits = Hits::default();
    let addr = start_server(hits.clone()).await;
    let scheduler = scheduler(
        vec![endpoint(addr, "fast", 1, 1), endpoint(addr, "other", 2, 1)],
        3,
    );
    assert_eq!(scheduler.triggers().len(), 2);
    let (tx, handle) = spawn_run(&scheduler);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    tx.send(true).unwrap();
    handle.await.unwrap();

    let fast = hits.fast.load(Ordering::SeqCst);
    let other = hits.other.load(Ordering::SeqCst);
    assert!((2..=3).contains(&fast), "1s group fired {fast} times");
    assert_eq!(other, 1, "2s group fired {other} times");
}

#[tokio::test]
async fn overlapping_firings_beyond_cap_are_skipped() {
    let hits = Hits::default();
    let addr = start_server(hits.clone()).await;
    // Each probe takes 2.8s against a 1s interval, with room for one
    // firing at a time.
    let scheduler = scheduler(vec![endpoint(addr, "slow", 1, 10)], 1);
    let trigger = Arc::clone(&scheduler.triggers()[0]);
    let (tx, handle) = spawn_run(&scheduler);

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(hits.slow.load(Ordering::SeqCst), 1);
    assert_eq!(trigger.fired(), 1);
    assert!(trigger.skipped() >= 2, "skipped {}", trigger.skipped());
    assert_eq!(trigger.state(), TriggerState::Firing);
    assert_eq!(trigger.in_flight(), 1);

    // Shutdown waits for the in-flight probe rather than cancelling it.
    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(3), handle)
        .await
        .expect("in-flight firing should drain")
        .unwrap();

    assert_eq!(trigger.in_flight(), 0);
    assert_eq!(trigger.state(), TriggerState::Stopped);
    assert_eq!(hits.slow.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn overlapping_firings_within_cap_run_together() {
    let hits = Hits::default();
    let addr = start_server(hits.clone()).await;
    let scheduler = scheduler(vec![endpoint(addr, "slow", 1, 10)], 3);
    let trigger = Arc::clone(&scheduler.triggers()[0]);
    let (tx, handle) = spawn_run(&scheduler);

    // Firings at 1s and 2s overlap; both are admitted.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(hits.slow.load(Ordering::SeqCst), 2);
    assert_eq!(trigger.in_flight(), 2);
    assert_eq!(trigger.skipped(), 0);

    tx.send(true).unwrap();
    handle.await.unwrap();
    assert_eq!(trigger.in_flight(), 0);
}
