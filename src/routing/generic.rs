//! Target extraction and allowlist for the generic `/proxy` forwarder.

use axum::http::HeaderMap;

use crate::error::ProxyError;

/// Header carrying the absolute target URL.
pub const TARGET_URL_HEADER: &str = "x-target-url";

/// Query parameter consulted when the header is absent.
const TARGET_URL_PARAM: &str = "url";

/// Origins a `/proxy` target may start with. Plain string-prefix match.
pub const ALLOWED_TARGETS: &[&str] = &[
    "https://api.patentsview.org",
    "https://search.patentsview.org",
    "https://export.arxiv.org",
    "https://api.lens.org",
    "https://api.openalex.org",
    "https://api.semanticscholar.org",
    "https://api.crossref.org",
];

pub fn is_allowed_target(target: &str) -> bool {
    allowed_host(target).is_some()
}

/// Host of the allowlist entry `target` starts with.
///
/// The prefix alone says nothing about where the URL points
/// (`https://api.crossref.org@evil.example/`), so callers compare this
/// against the parsed host.
pub fn allowed_host(target: &str) -> Option<&'static str> {
    ALLOWED_TARGETS
        .iter()
        .copied()
        .find(|allowed| target.starts_with(allowed))
        .map(|allowed| allowed.trim_start_matches("https://"))
}

/// Pick the target URL from `X-Target-URL`, falling back to `?url=`, and
/// check it against the allowlist.
pub fn resolve_target(headers: &HeaderMap, query: Option<&str>) -> Result<String, ProxyError> {
    let from_header = headers
        .get(TARGET_URL_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    let target = from_header
        .or_else(|| {
            query.and_then(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .find(|(key, _)| key == TARGET_URL_PARAM)
                    .map(|(_, value)| value.into_owned())
            })
        })
        .filter(|t| !t.is_empty())
        .ok_or(ProxyError::MissingTarget)?;

    if !is_allowed_target(&target) {
        return Err(ProxyError::TargetNotAllowed);
    }

    Ok(target)
}
