//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the mux as its only service
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Serve on a listener until shutdown is signalled

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::dispatch::{Mux, MuxService};
use crate::http::request::MakeRequestUuid;

/// HTTP server for a [`Mux`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `mux`.
    pub fn new(config: ServerConfig, mux: Mux) -> Self {
        let router = Self::build_router(&config, mux.into_service());
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Every request, whatever its path, reaches the mux; the mux decides
    /// between handler, 404, 405 and OPTIONS.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, service: MuxService) -> Router {
        Router::new()
            .fallback_service(service)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
