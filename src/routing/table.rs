//! Static route table.
//!
//! Each entry maps a path prefix to an upstream base URL together with the
//! rewrite rules applied when forwarding. Order matters: `resolve` returns
//! the first entry whose prefix matches.

/// Path served by the generic allowlisted forwarder.
pub const GENERIC_PATH: &str = "/proxy";

/// What happens to the inbound query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPolicy {
    Preserve,
    Drop,
}

/// Outbound method selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPolicy {
    /// Use the inbound method; a `POST` body is forwarded.
    Passthrough,
    /// Always issue a bodiless `GET`.
    ForceGet,
}

/// Headers set on the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// No headers beyond what the HTTP client adds itself.
    None,
    /// `Content-Type: application/json`.
    Json,
    /// `Content-Type: application/json` plus the inbound `Authorization`, if any.
    JsonWithAuthorization,
}

/// A named upstream route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Route identifier for logging/metrics.
    pub name: &'static str,

    /// Inbound path prefix, stripped before forwarding.
    pub prefix: &'static str,

    /// Upstream base URL, ending in `/`.
    pub upstream_base: &'static str,

    pub query: QueryPolicy,
    pub method: MethodPolicy,
    pub headers: HeaderPolicy,

    /// Content type stamped on the relayed response.
    pub relay_content_type: &'static str,
}

impl Route {
    /// Build the outbound URL for the path remainder after the prefix.
    ///
    /// The query is appended with its `?` only when non-empty and the
    /// route preserves it.
    pub fn upstream_url(&self, rest: &str, query: Option<&str>) -> String {
        match (self.query, query) {
            (QueryPolicy::Preserve, Some(q)) if !q.is_empty() => {
                format!("{}{}?{}", self.upstream_base, rest, q)
            }
            _ => format!("{}{}", self.upstream_base, rest),
        }
    }
}

pub static ROUTES: &[Route] = &[
    Route {
        name: "uspto",
        prefix: "/uspto/",
        upstream_base: "https://api.patentsview.org/",
        query: QueryPolicy::Preserve,
        method: MethodPolicy::Passthrough,
        headers: HeaderPolicy::Json,
        relay_content_type: "application/json",
    },
    Route {
        name: "uspto-search",
        prefix: "/uspto-search/",
        upstream_base: "https://search.patentsview.org/",
        query: QueryPolicy::Preserve,
        method: MethodPolicy::Passthrough,
        headers: HeaderPolicy::Json,
        relay_content_type: "application/json",
    },
    Route {
        name: "arxiv",
        prefix: "/arxiv/",
        upstream_base: "https://export.arxiv.org/",
        query: QueryPolicy::Preserve,
        method: MethodPolicy::ForceGet,
        headers: HeaderPolicy::None,
        relay_content_type: "application/xml",
    },
    // Query string is dropped for this route.
    Route {
        name: "lens",
        prefix: "/lens/",
        upstream_base: "https://api.lens.org/",
        query: QueryPolicy::Drop,
        method: MethodPolicy::Passthrough,
        headers: HeaderPolicy::JsonWithAuthorization,
        relay_content_type: "application/json",
    },
    Route {
        name: "scholar",
        prefix: "/scholar/",
        upstream_base: "https://api.semanticscholar.org/",
        query: QueryPolicy::Preserve,
        method: MethodPolicy::ForceGet,
        headers: HeaderPolicy::None,
        relay_content_type: "application/json",
    },
];
