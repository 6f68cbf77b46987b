//! Endpoint prober.
//!
//! Sends one GET per probe, bounded by the endpoint's timeout, and turns
//! whatever comes back into a [`ProbeOutcome`]. Every probe logs exactly
//! one outcome line and raises at most one alert.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use tracing::{error, info, warn};

use pulse_core::Endpoint;

use crate::alert::SharedAlertSink;
use crate::classifier::{ProbeKind, ServiceStatus, SubServices, classify, is_json};
use crate::client::ProbeClient;

/// Result of one probe attempt. Not persisted.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub endpoint: Arc<Endpoint>,
    /// Time until response headers arrived, or until the attempt failed.
    pub latency_ms: f64,
    pub kind: ProbeKind,
    pub http_status: Option<u16>,
    pub sub_services: Option<SubServices>,
}

/// Probes endpoints over a shared client and reports failures to an
/// alert sink.
#[derive(Clone)]
pub struct Prober {
    client: ProbeClient,
    alerts: SharedAlertSink,
}

impl Prober {
    pub fn new(client: ProbeClient, alerts: SharedAlertSink) -> Self {
        Self { client, alerts }
    }

    /// Probe one endpoint.
    pub async fn probe(&self, endpoint: Arc<Endpoint>) -> ProbeOutcome {
        let started = Instant::now();
        let result =
            tokio::time::timeout(endpoint.timeout, self.client.get(endpoint.url.clone())).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let resp = match result {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!(
                    endpoint = %endpoint.name,
                    url = %endpoint.url,
                    error = %e,
                    "connection error"
                );
                self.alerts.notify(&connection_alert(&endpoint));
                return failed(endpoint, latency_ms, ProbeKind::ConnectionError);
            }
            Err(_) => return self.timed_out(endpoint, latency_ms),
        };

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let classification = if is_json(content_type.as_deref()) {
            // The body shares the request's timeout budget.
            let remaining = endpoint.timeout.saturating_sub(started.elapsed());
            match read_body(resp, remaining).await {
                Ok(body) => classify(status, content_type.as_deref(), &body),
                Err(BodyError::TimedOut) => {
                    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                    return self.timed_out(endpoint, elapsed_ms);
                }
                Err(BodyError::Read(e)) => {
                    warn!(
                        endpoint = %endpoint.name,
                        url = %endpoint.url,
                        error = %e,
                        "failed to read response body"
                    );
                    classify(status, None, &[])
                }
            }
        } else {
            classify(status, content_type.as_deref(), &[])
        };

        if let Some(e) = &classification.body_error {
            warn!(endpoint = %endpoint.name, url = %endpoint.url, error = %e, "ignoring response body");
        }
        if let Some(services) = &classification.sub_services {
            log_sub_services(&endpoint, services);
        }

        let latency = round_ms(latency_ms);
        match classification.kind {
            ProbeKind::Up => {
                info!(
                    endpoint = %endpoint.name,
                    url = %endpoint.url,
                    latency_ms = latency,
                    status,
                    "endpoint up"
                );
            }
            _ => {
                error!(
                    endpoint = %endpoint.name,
                    url = %endpoint.url,
                    latency_ms = latency,
                    status,
                    "endpoint down"
                );
                self.alerts.notify(&down_alert(&endpoint, latency_ms, status));
            }
        }

        ProbeOutcome {
            endpoint,
            latency_ms,
            kind: classification.kind,
            http_status: Some(status),
            sub_services: classification.sub_services,
        }
    }

    fn timed_out(&self, endpoint: Arc<Endpoint>, latency_ms: f64) -> ProbeOutcome {
        warn!(
            endpoint = %endpoint.name,
            url = %endpoint.url,
            timeout_secs = endpoint.timeout.as_secs(),
            "request timed out"
        );
        self.alerts.notify(&timeout_alert(&endpoint));
        failed(endpoint, latency_ms, ProbeKind::Timeout)
    }
}

fn failed(endpoint: Arc<Endpoint>, latency_ms: f64, kind: ProbeKind) -> ProbeOutcome {
    ProbeOutcome {
        endpoint,
        latency_ms,
        kind,
        http_status: None,
        sub_services: None,
    }
}

enum BodyError {
    TimedOut,
    Read(hyper::Error),
}

async fn read_body(resp: hyper::Response<Incoming>, timeout: Duration) -> Result<Bytes, BodyError> {
    match tokio::time::timeout(timeout, resp.into_body().collect()).await {
        Ok(Ok(collected)) => Ok(collected.to_bytes()),
        Ok(Err(e)) => Err(BodyError::Read(e)),
        Err(_) => Err(BodyError::TimedOut),
    }
}

fn log_sub_services(endpoint: &Endpoint, services: &SubServices) {
    for (service, status) in services {
        match status {
            ServiceStatus::Up => {
                info!(%service, endpoint = %endpoint.name, url = %endpoint.url, "sub-service up");
            }
            ServiceStatus::Down => {
                error!(%service, endpoint = %endpoint.name, url = %endpoint.url, "sub-service down");
            }
        }
    }
}

fn round_ms(ms: f64) -> f64 {
    (ms * 10.0).round() / 10.0
}

pub fn connection_alert(endpoint: &Endpoint) -> String {
    format!("Connection error for {}", endpoint.url)
}

pub fn timeout_alert(endpoint: &Endpoint) -> String {
    format!(
        "Request timed out for {} after {} seconds",
        endpoint.url,
        endpoint.timeout.as_secs()
    )
}

pub fn down_alert(endpoint: &Endpoint, latency_ms: f64, status: u16) -> String {
    format!(
        "Healthcheck failed - response time: {latency_ms:.1} ms - endpoint: {} - status code: {status} - status: down",
        endpoint.url
    )
}
