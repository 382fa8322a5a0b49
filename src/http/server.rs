//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single wildcard route
//! - Wire up middleware (tracing)
//! - Buffer each inbound body and hand the request to the forwarder
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::lifecycle::signals::shutdown_signal;
use crate::proxy::{Forwarder, InboundRequest, ProxyError, ProxyResponse};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the authenticating proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around a forwarder.
    pub fn new(forwarder: Forwarder) -> Self {
        let router = Self::build_router(AppState {
            forwarder: Arc::new(forwarder),
        });
        Self { router }
    }

    /// Build the Axum router. Every method on every path reaches the forwarder.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                    _ = shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wildcard handler.
/// Buffers the body, then forwards. Dropping this future (caller went away)
/// drops the in-flight upstream call with it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, path = %parts.uri.path(), "Failed to read request body");
            return ProxyResponse::from(ProxyError::InboundBody).into_response();
        }
    };

    state
        .forwarder
        .handle(InboundRequest::from_parts(parts, body))
        .await
        .into_response()
}
