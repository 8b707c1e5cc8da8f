//! FTO Scout API Proxy library.
//!
//! Relays browser requests to a fixed set of patent and scholarly data
//! APIs and attaches CORS headers to every response.

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use upstream::{Forwarder, HttpForwarder, OutboundRequest, UpstreamResponse};
