//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch decision + inbound parts
//!     → outbound.rs (URL rewrite, header/body rules → OutboundRequest)
//!     → client.rs (Forwarder: single outbound call)
//!     → UpstreamResponse (status, content type, body)
//! ```

pub mod client;
pub mod outbound;

pub use client::{Forwarder, HttpForwarder};
pub use outbound::{OutboundRequest, UpstreamResponse};
