//! CORS response headers.
//!
//! Applied as the innermost layer so every response, errors and
//! preflights included, leaves with the same four headers.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::config::CorsConfig;

pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Target-URL";
pub const MAX_AGE: &str = "86400";

/// Decides the `Access-Control-Allow-Origin` value.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_origins: Vec<HeaderValue>,
}

impl CorsPolicy {
    /// Echo any origin.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Entries that are not valid header values are skipped; validation
    /// rejects them before a config gets here.
    pub fn from_config(config: &CorsConfig) -> Self {
        Self {
            allowed_origins: config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect(),
        }
    }

    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        let Some(first) = self.allowed_origins.first() else {
            return origin
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("*"));
        };

        match origin {
            Some(o) if self.allowed_origins.contains(o) => o.clone(),
            _ => first.clone(),
        }
    }

    pub fn apply(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin(origin));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
    }
}

pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();
    let mut response = next.run(request).await;
    policy.apply(origin.as_ref(), response.headers_mut());
    response
}
