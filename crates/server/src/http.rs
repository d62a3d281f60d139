//! HTTP server for the memory service.

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use mnemo_engine::MemoryService;
use tokio::signal;

use crate::handlers::{
    handle_health, handle_purge, handle_query, handle_read, handle_write, require_api_key,
    AppState,
};

/// Build the router; `/memory` routes require the API key, `/health` does not
pub fn router(state: AppState) -> Router {
    let memory = Router::new()
        .route("/memory/:project/write", post(handle_write))
        .route("/memory/:project/read", get(handle_read))
        .route("/memory/:project/query", post(handle_query))
        .route("/memory/:project/purge", delete(handle_purge))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(handle_health))
        .merge(memory)
        .with_state(state)
}

/// HTTP server for the memory service.
pub struct MemoryServer {
    service: MemoryService,
    bind: String,
    api_key: String,
}

impl MemoryServer {
    /// Create a new server.
    pub fn new(service: MemoryService, bind: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            service,
            bind: bind.into(),
            api_key: api_key.into(),
        }
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run(self) -> std::io::Result<()> {
        let app = router(AppState::new(self.service, self.api_key));

        let listener = tokio::net::TcpListener::bind(&self.bind).await?;
        tracing::info!("Starting Mnemo HTTP server on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shut down gracefully");
        Ok(())
    }
}

/// Listen for SIGTERM and SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
