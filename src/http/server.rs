//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the axum Router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, CORS)
//! - Dispatch requests through the routing table
//! - Forward to the upstream and relay the result
//! - Turn every failure into a JSON error response

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{request::Parts, HeaderValue, Method, Request},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::cors::{cors_middleware, CorsPolicy};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{resolve, resolve_target, Dispatch};
use crate::upstream::outbound::wants_body;
use crate::upstream::{Forwarder, HttpForwarder, OutboundRequest};

/// Relayed for `/proxy` when the upstream sends no content type.
const DEFAULT_RELAY_CONTENT_TYPE: &str = "text/plain";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<dyn Forwarder>,
    pub max_body_bytes: usize,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server that forwards over HTTPS with reqwest.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let forwarder = HttpForwarder::new(&config.timeouts)?;
        Ok(Self::with_forwarder(config, Arc::new(forwarder)))
    }

    /// Create a server around an arbitrary forwarder.
    pub fn with_forwarder(config: ProxyConfig, forwarder: Arc<dyn Forwarder>) -> Self {
        let state = AppState {
            forwarder,
            max_body_bytes: config.limits.max_body_bytes,
        };
        let cors = Arc::new(CorsPolicy::from_config(&config.cors));
        let router = Self::build_router(state, cors);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    ///
    /// Outermost to innermost: request ID, trace, request ID propagation, CORS.
    fn build_router(state: AppState, cors: Arc<CorsPolicy>) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(cors, cors_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler. Always produces a response.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (parts, body) = request.into_parts();
    let dispatch = resolve(&parts.method, parts.uri.path());
    let route = dispatch.label();

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
        route,
        "Handling request"
    );

    let response = match handle(&state, dispatch, &parts, body).await {
        Ok(response) => response,
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(request_id = %request_id, route, kind = e.kind(), error = %e, "Request failed");
            } else {
                tracing::warn!(request_id = %request_id, route, kind = e.kind(), error = %e, "Request rejected");
            }
            e.into_response()
        }
    };

    metrics::record_request(route, response.status().as_u16(), start_time);
    response
}

async fn handle(
    state: &AppState,
    dispatch: Dispatch<'_>,
    parts: &Parts,
    body: Body,
) -> Result<Response, ProxyError> {
    match dispatch {
        Dispatch::Preflight => Ok(response::preflight()),
        Dispatch::Health => Ok(response::health()),
        Dispatch::NotFound => Err(ProxyError::UnknownEndpoint),
        Dispatch::Forward { route, rest } => {
            let wanted = wants_body(&parts.method, route.method);
            let body = read_body(wanted, body, state.max_body_bytes).await?;
            let outbound = OutboundRequest::for_route(
                route,
                rest,
                parts.uri.query(),
                &parts.method,
                &parts.headers,
                body,
            )?;

            let upstream = state.forwarder.forward(outbound).await?;
            Ok(response::relay(
                upstream,
                HeaderValue::from_static(route.relay_content_type),
            ))
        }
        Dispatch::Generic => {
            let target = resolve_target(&parts.headers, parts.uri.query())?;
            let wanted = parts.method == Method::POST;
            let body = read_body(wanted, body, state.max_body_bytes).await?;
            let outbound =
                OutboundRequest::for_target(&target, &parts.method, &parts.headers, body)?;

            let upstream = state.forwarder.forward(outbound).await?;
            let content_type = upstream
                .content_type
                .clone()
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_RELAY_CONTENT_TYPE));
            Ok(response::relay(upstream, content_type))
        }
    }
}

async fn read_body(wanted: bool, body: Body, limit: usize) -> Result<Option<Bytes>, ProxyError> {
    if !wanted {
        return Ok(None);
    }
    axum::body::to_bytes(body, limit)
        .await
        .map(Some)
        .map_err(|e| ProxyError::Body(e.to_string()))
}

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
