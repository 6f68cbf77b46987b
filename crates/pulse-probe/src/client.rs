//! Shared HTTP client.
//!
//! One pooled client serves every probe in the process. Cloning a client
//! is cheap and shares the same connection pool.

use bytes::Bytes;
use http_body_util::{Empty, Full};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::error::ProbeResult;

/// Connector that speaks plain HTTP and HTTPS.
pub type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;

/// Client used for bodiless GET probes.
pub type ProbeClient = Client<HttpsConnector, Empty<Bytes>>;

/// Client used for requests that carry a body (webhook alerts).
pub type PostClient = Client<HttpsConnector, Full<Bytes>>;

pub fn https_connector() -> ProbeResult<HttpsConnector> {
    let connector = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
        .https_or_http()
        .enable_http1()
        .build();
    Ok(connector)
}

/// Build the process-wide probe client.
pub fn build_client() -> ProbeResult<ProbeClient> {
    let connector = https_connector()?;
    Ok(Client::builder(TokioExecutor::new()).build(connector))
}

pub(crate) fn build_post_client() -> ProbeResult<PostClient> {
    let connector = https_connector()?;
    Ok(Client::builder(TokioExecutor::new()).build(connector))
}
