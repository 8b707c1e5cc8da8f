//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Issue exactly one outbound call per forwarded request
//! - Enforce connect and total timeouts
//! - Buffer the upstream body for relaying
//!
//! # Design Decisions
//! - No retries; a failed call surfaces as `ProxyError::Upstream`
//! - `Forwarder` is object safe so handlers hold `Arc<dyn Forwarder>`

use std::time::Duration;

use axum::http::header;
use futures_util::future::BoxFuture;

use crate::config::TimeoutConfig;
use crate::error::ProxyError;
use crate::upstream::outbound::{OutboundRequest, UpstreamResponse};

/// Performs the single outbound call for a request.
pub trait Forwarder: Send + Sync {
    fn forward(&self, request: OutboundRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>>;
}

/// reqwest-backed forwarder used in production.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
}

impl HttpForwarder {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .user_agent(concat!("fto-scout-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let OutboundRequest { method, url, headers, body } = request;

        tracing::debug!(method = %method, url = %url, "Forwarding upstream");

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Ok(UpstreamResponse { status, content_type, body })
    }
}

impl Forwarder for HttpForwarder {
    fn forward(&self, request: OutboundRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>> {
        Box::pin(self.send(request))
    }
}
