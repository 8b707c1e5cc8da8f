//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Classify an inbound request by method and path
//! - Return the matched named route with its path remainder
//! - Return an explicit no-match rather than a silent default

use axum::http::Method;

use super::table::{Route, GENERIC_PATH, ROUTES};

/// Outcome of route resolution, evaluated in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// CORS preflight on any path.
    Preflight,
    /// `/` or `/health`.
    Health,
    /// A named upstream route and the path remainder after its prefix.
    Forward { route: &'static Route, rest: &'a str },
    /// The allowlisted generic forwarder at `/proxy`.
    Generic,
    NotFound,
}

impl Dispatch<'_> {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Dispatch::Preflight => "preflight",
            Dispatch::Health => "health",
            Dispatch::Forward { route, .. } => route.name,
            Dispatch::Generic => "proxy",
            Dispatch::NotFound => "none",
        }
    }
}

/// Resolve a request to a dispatch decision. First match wins.
pub fn resolve<'a>(method: &Method, path: &'a str) -> Dispatch<'a> {
    if method == Method::OPTIONS {
        return Dispatch::Preflight;
    }

    if path == "/" || path == "/health" {
        return Dispatch::Health;
    }

    for route in ROUTES {
        if let Some(rest) = path.strip_prefix(route.prefix) {
            return Dispatch::Forward { route, rest };
        }
    }

    if path == GENERIC_PATH {
        return Dispatch::Generic;
    }

    Dispatch::NotFound
}
