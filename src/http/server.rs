//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Create the Axum router with the relay route
//! - Wire up middleware (request timeout, inbound body cap, tracing)
//! - Serve connections until the shutdown channel fires
//! - Drain in-flight exchanges before returning control

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::relay::{relay_handler, RelayState};
use crate::traffic::TrafficLog;
use crate::transport::Transport;

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
}

impl RelayServer {
    /// Create a new server from its injected collaborators.
    pub fn new(config: RelayConfig, transport: Arc<dyn Transport>, traffic: TrafficLog) -> Self {
        let state = RelayState { transport, traffic };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: RelayState) -> Router {
        Router::new()
            .route("/", post(relay_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_request_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve connections until the shutdown channel fires.
    ///
    /// On shutdown the listener stops accepting, in-flight exchanges drain
    /// (bounded by the request timeout), and control returns to the caller
    /// only once the listener is fully closed.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
