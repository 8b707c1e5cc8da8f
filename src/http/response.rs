//! Response construction.
//!
//! # Responsibilities
//! - Relay an upstream response with the chosen content type
//! - Build the fixed health and preflight responses
//! - Serialize JSON payloads (errors included)

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::upstream::UpstreamResponse;

pub const SERVICE_NAME: &str = "FTO Scout API Proxy";

/// Body of `/` and `/health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, Json(body)).into_response()
}

pub fn health() -> Response {
    json_response(
        StatusCode::OK,
        &HealthStatus {
            status: "ok",
            service: SERVICE_NAME,
        },
    )
}

/// Empty 204; the CORS layer supplies the headers.
pub fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Upstream status and body verbatim, stamped with `content_type`.
pub fn relay(upstream: UpstreamResponse, content_type: HeaderValue) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    response
}
