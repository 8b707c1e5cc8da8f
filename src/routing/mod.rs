//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered dispatch: preflight, health, named routes, /proxy)
//!     → table.rs (static route table with rewrite rules)
//!     → generic.rs (target extraction + allowlist for /proxy)
//!     → Return: Dispatch decision
//! ```
//!
//! # Design Decisions
//! - Route table is a static slice, immutable for the life of the process
//! - Prefix matching only, no regex
//! - Deterministic: same input always resolves to the same upstream URL
//! - First match wins, in table order

pub mod generic;
pub mod router;
pub mod table;

pub use generic::{allowed_host, is_allowed_target, resolve_target, ALLOWED_TARGETS, TARGET_URL_HEADER};
pub use router::{resolve, Dispatch};
pub use table::{HeaderPolicy, MethodPolicy, QueryPolicy, Route, GENERIC_PATH, ROUTES};

/// Endpoints advertised in the 404 body: every named prefix, then `/proxy`.
pub fn available_endpoints() -> Vec<&'static str> {
    ROUTES
        .iter()
        .map(|route| route.prefix)
        .chain(std::iter::once(GENERIC_PATH))
        .collect()
}
