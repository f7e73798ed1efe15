//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::domain::SystemClock;
use crate::errors::{AppError, AppResult};
use crate::infra::{CacheStore, Database, JobQueue, MemoryCache, RedisCache, SqlContactStore, SqlUserStore};
use crate::jobs::JobRunner;
use crate::services::{Backends, Services};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Arc::new(Database::connect(&config).await?);
    let cache = connect_cache(&config).await;
    let queue = Arc::new(JobQueue::connect(&config.database_url).await?);

    let runner = config.run_workers.then(|| JobRunner::start(&queue));

    let connection = db.get_connection();
    let services = Services::from_backends(
        Backends {
            contact_store: Arc::new(SqlContactStore::new(connection.clone())),
            user_store: Arc::new(SqlUserStore::new(connection)),
            cache: cache.clone(),
            notifier: queue.clone(),
            mailer: queue,
            clock: Arc::new(SystemClock),
        },
        &config,
    );
    let app = create_router(AppState::from_services(&services, cache, Some(db)));

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)));

    if let Some(runner) = runner {
        runner.stop().await?;
    }

    served
}

/// Redis when reachable, otherwise an in-process cache.
async fn connect_cache(config: &Config) -> Arc<dyn CacheStore> {
    match RedisCache::connect(&config.redis_url).await {
        Ok(redis) => Arc::new(redis),
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, using in-process cache");
            Arc::new(MemoryCache::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
