//! Alert delivery.
//!
//! The prober only decides when to alert and with what message. Where
//! the message goes is up to the [`AlertSink`] it was built with.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Uri, header};
use http_body_util::Full;
use tracing::{debug, info, warn};

use crate::client::{PostClient, build_post_client};
use crate::error::{ProbeError, ProbeResult};

/// Receives alert messages. Fire-and-forget: no acknowledgement, no
/// retry.
pub trait AlertSink: Send + Sync {
    fn notify(&self, message: &str);
}

pub type SharedAlertSink = Arc<dyn AlertSink>;

/// Writes alerts to the log. Used when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&self, message: &str) {
        info!(alert = %message, "sending alert");
    }
}

/// Posts alerts to a Slack incoming webhook.
pub struct SlackWebhookSink {
    client: PostClient,
    url: Uri,
}

impl SlackWebhookSink {
    pub fn new(url: &str) -> ProbeResult<Self> {
        let invalid = |reason: &str| ProbeError::InvalidWebhook {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;
        if !matches!(uri.scheme_str(), Some("http") | Some("https")) || uri.authority().is_none() {
            return Err(invalid("expected an absolute http(s) url"));
        }

        Ok(Self {
            client: build_post_client()?,
            url: uri,
        })
    }

    fn request(&self, message: &str) -> Result<Request<Full<Bytes>>, http::Error> {
        let payload = serde_json::json!({ "text": message }).to_string();
        Request::builder()
            .method(Method::POST)
            .uri(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload)))
    }
}

impl AlertSink for SlackWebhookSink {
    fn notify(&self, message: &str) {
        let req = match self.request(message) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "failed to build webhook request");
                return;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(alert = %message, "no runtime available, webhook alert dropped");
            return;
        };

        let client = self.client.clone();
        runtime.spawn(async move {
            match client.request(req).await {
                Ok(resp) if resp.status().is_success() => {
                    debug!(status = %resp.status(), "webhook alert delivered");
                }
                Ok(resp) => {
                    warn!(status = %resp.status(), "webhook rejected alert");
                }
                Err(e) => {
                    warn!(error = %e, "webhook alert delivery failed");
                }
            }
        });
    }
}
