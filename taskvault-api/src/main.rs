//! # TaskVault API Server
//!
//! Serves registration, login and per-user task endpoints.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p taskvault-api
//! ```
//!
//! Without `DATABASE_URL` the server keeps everything in memory.

use std::sync::Arc;
use taskvault_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskvault_shared::{
    auth::password::Argon2Hasher,
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{MemoryStore, PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskvault_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskVault API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let pool = match &config.database.url {
        Some(url) => {
            let pool = create_pool(DatabaseConfig {
                url: url.clone(),
                max_connections: config.database.max_connections,
                ..Default::default()
            })
            .await?;
            run_migrations(&pool).await?;
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on exit)");
            None
        }
    };

    let store: Arc<dyn Store> = match &pool {
        Some(pool) => Arc::new(PgStore::new(pool.clone())),
        None => Arc::new(MemoryStore::new()),
    };

    let bind_address = config.bind_address();
    let state = AppState::new(config, store, Arc::new(Argon2Hasher::default()))?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
