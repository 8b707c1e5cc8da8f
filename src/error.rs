//! Error taxonomy for request handling.
//!
//! Every variant maps to exactly one HTTP status and a JSON body with an
//! `error` field, so the handler can turn any failure into a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::http::response::json_response;
use crate::routing::available_endpoints;

/// Failures produced while resolving or forwarding a request.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// `/proxy` called without `X-Target-URL` or a `url` query parameter.
    #[error("Missing target URL")]
    MissingTarget,

    /// `/proxy` target does not start with an allowlisted origin.
    #[error("Target URL not in allowlist")]
    TargetNotAllowed,

    #[error("Unknown endpoint")]
    UnknownEndpoint,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The inbound body could not be read (client reset, size limit).
    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingTarget => StatusCode::BAD_REQUEST,
            ProxyError::TargetNotAllowed => StatusCode::FORBIDDEN,
            ProxyError::UnknownEndpoint => StatusCode::NOT_FOUND,
            ProxyError::InvalidUrl(_) | ProxyError::Body(_) | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::MissingTarget => "missing_target",
            ProxyError::TargetNotAllowed => "target_not_allowed",
            ProxyError::UnknownEndpoint => "unknown_endpoint",
            ProxyError::InvalidUrl(_) => "invalid_url",
            ProxyError::Body(_) => "body",
            ProxyError::Upstream(_) => "upstream",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ProxyError::UnknownEndpoint => json!({
                "error": self.to_string(),
                "available": available_endpoints(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        json_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::MissingTarget.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ProxyError::TargetNotAllowed.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ProxyError::UnknownEndpoint.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ProxyError::InvalidUrl("relative URL without a base".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_match_wire_format() {
        assert_eq!(ProxyError::MissingTarget.to_string(), "Missing target URL");
        assert_eq!(ProxyError::TargetNotAllowed.to_string(), "Target URL not in allowlist");
        assert_eq!(ProxyError::UnknownEndpoint.to_string(), "Unknown endpoint");
    }
}
