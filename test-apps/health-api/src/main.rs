//! Flaky health endpoint for exercising pulsed by hand.
//!
//! Serves `GET /health` on :8080 and cycles through the failure modes the
//! monitor has to handle:
//!
//!   even     → 500 Internal Server Error
//!   3        → 200 after a 4 second stall (trips a 3s timeout)
//!   5        → 200 with a `checks` map reporting postgres down
//!   1, 7, 9  → 200 with every check up
//!
//! Run: cargo run, then point an endpoints file at
//! http://localhost:8080/health.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tracing::info;

/// Request counter, used to pick the next behaviour.
#[derive(Default)]
struct AppState {
    requests: AtomicU64,
}

fn json_body(status: StatusCode, body: serde_json::Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

/// What the nth request gets back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Error,
    Stall,
    PostgresDown,
    Healthy,
}

fn reply_for(request: u64) -> Reply {
    match request % 10 {
        n if n % 2 == 0 => Reply::Error,
        3 => Reply::Stall,
        5 => Reply::PostgresDown,
        _ => Reply::Healthy,
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Response {
    let n = state.requests.fetch_add(1, Ordering::Relaxed);

    match reply_for(n) {
        Reply::Error => json_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"status": "error", "code": 500}),
        ),
        Reply::Stall => {
            info!("sleeping for 4 seconds");
            tokio::time::sleep(Duration::from_secs(4)).await;
            json_body(
                StatusCode::OK,
                json!({"status": "ok", "code": 200, "checks": {"postgres": "up"}}),
            )
        }
        Reply::PostgresDown => json_body(
            StatusCode::OK,
            json!({"status": "ok", "code": 200, "checks": {"postgres": "down"}}),
        ),
        Reply::Healthy => json_body(
            StatusCode::OK,
            json!({"status": "ok", "code": 200, "checks": {"postgres": "up"}}),
        ),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let app = Router::new()
        .route("/health", get(health))
        .with_state(Arc::new(AppState::default()));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind :8080");
    info!("health api listening on :8080");
    axum::serve(listener, app).await.expect("server error");
}
