pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use logic::{FieldErrors, FigureService, ServiceError, Validator};

// Export all model types
pub use model::*;

// Export store types
pub use store::{FigureStore, MemoryStore, PostgresStore, StoreError};

use std::sync::Arc;

use axum::serve;
use tokio::net::TcpListener;

use crate::config::AppConfig;

/// Connect the configured store and serve until shutdown is requested.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    if config.database.in_memory {
        log::warn!("Using in-memory storage; figures will not survive a restart");
        return serve_store(Arc::new(MemoryStore::new()), &config).await;
    }

    let database_url = config.database_url()?;
    log::info!("Connecting to PostgreSQL...");
    let postgres_store = PostgresStore::new(&database_url, config.max_connections()).await?;

    log::info!("Running database migrations...");
    postgres_store.migrate().await?;

    serve_store(Arc::new(postgres_store), &config).await
}

async fn serve_store<S: FigureStore + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let app = routes::build_app(store, &config.environment, config.server.max_body_bytes);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!(
        "Starting {} server on http://{}",
        config.environment,
        bind_address
    );

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
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

    log::info!("Shutdown signal received, finishing in-flight requests");
}
