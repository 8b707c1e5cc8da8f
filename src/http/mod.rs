//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, request ID, tracing, CORS layer)
//!     → routing::resolve (dispatch decision)
//!     → upstream (outbound request + single forwarded call)
//!     → response.rs (relay with route content type, JSON payloads)
//!     → cors.rs (CORS headers on every response)
//!     → Send to client
//! ```

pub mod cors;
pub mod response;
pub mod server;

pub use cors::CorsPolicy;
pub use server::{shutdown_signal, AppState, HttpServer};
