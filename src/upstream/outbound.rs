//! Outbound request construction.
//!
//! # Responsibilities
//! - Rewrite the inbound path/query onto the upstream base
//! - Apply the route's header policy
//! - Attach the inbound body only for passthrough `POST`

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use url::Url;

use crate::error::ProxyError;
use crate::routing::{allowed_host, HeaderPolicy, MethodPolicy, Route};

fn application_json() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// A fully resolved request ready for the upstream client.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// What came back from the upstream, buffered.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl OutboundRequest {
    /// Build the request for a named route.
    ///
    /// `body` is only consulted when the route passes the method through and
    /// the inbound method is `POST`.
    pub fn for_route(
        route: &Route,
        rest: &str,
        query: Option<&str>,
        method: &Method,
        inbound: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Self, ProxyError> {
        let url = parse_url(&route.upstream_url(rest, query))?;

        let (method, body) = match route.method {
            MethodPolicy::ForceGet => (Method::GET, None),
            MethodPolicy::Passthrough => (method.clone(), post_body(method, body)),
        };

        let mut headers = HeaderMap::new();
        match route.headers {
            HeaderPolicy::None => {}
            HeaderPolicy::Json => {
                headers.insert(header::CONTENT_TYPE, application_json());
            }
            HeaderPolicy::JsonWithAuthorization => {
                headers.insert(header::CONTENT_TYPE, application_json());
                if let Some(auth) = inbound.get(header::AUTHORIZATION) {
                    headers.insert(header::AUTHORIZATION, auth.clone());
                }
            }
        }

        Ok(Self { method, url, headers, body })
    }

    /// Build the request for an allowlisted `/proxy` target.
    ///
    /// The parsed host must be the host of the allowlist entry the target
    /// starts with.
    pub fn for_target(
        target: &str,
        method: &Method,
        inbound: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Self, ProxyError> {
        let url = parse_url(target)?;
        let expected_host = allowed_host(target).ok_or(ProxyError::TargetNotAllowed)?;
        if url.host_str() != Some(expected_host) {
            return Err(ProxyError::TargetNotAllowed);
        }

        let content_type = inbound
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(application_json);
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, content_type);

        Ok(Self {
            method: method.clone(),
            url,
            headers,
            body: post_body(method, body),
        })
    }
}

/// Whether a request with this method on this route needs the inbound body read.
pub fn wants_body(method: &Method, policy: MethodPolicy) -> bool {
    policy == MethodPolicy::Passthrough && method == Method::POST
}

fn post_body(method: &Method, body: Option<Bytes>) -> Option<Bytes> {
    if method == Method::POST {
        Some(body.unwrap_or_default())
    } else {
        None
    }
}

fn parse_url(raw: &str) -> Result<Url, ProxyError> {
    Url::parse(raw).map_err(|e| ProxyError::InvalidUrl(format!("{raw}: {e}")))
}
