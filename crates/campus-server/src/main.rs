//! Server binary for the campus event participation service.
//!
//! Wires configuration, logging, the chosen entity store backend, and
//! the HTTP API together, then serves until a shutdown signal.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`CAMPUS_CONFIG` or `campus-config.yaml`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the entity store (memory, or `PostgreSQL` plus migrations)
//! 4. Seed demo data when enabled and the store is empty
//! 5. Serve the HTTP API

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use campus_api::{AppState, ServerConfig, start_server};
use campus_core::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use campus_core::{CampusConfig, LogFormat, LoggingConfig, StoreBackend, seed_demo_data};
use campus_store::{EntityStore, MemoryStore, PostgresConfig, PostgresStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, store setup, seeding, or the
/// server itself fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = CampusConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        path = %config_path.display(),
        backend = ?config.store.backend,
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    // 3-5. Open the store, seed, serve.
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            serve(MemoryStore::new(), &config).await
        }
        StoreBackend::Postgres => {
            let url = config
                .store
                .postgres_url
                .as_deref()
                .context("store.postgres_url (or DATABASE_URL) is required for the postgres backend")?;
            let pg_config = PostgresConfig::new(url)
                .with_max_connections(config.store.max_connections)
                .with_connect_timeout(Duration::from_secs(config.store.connect_timeout_secs))
                .with_idle_timeout(Duration::from_secs(config.store.idle_timeout_secs));
            let store = PostgresStore::connect(&pg_config)
                .await
                .context("connecting to PostgreSQL")?;
            if config.store.run_migrations {
                store
                    .run_migrations()
                    .await
                    .context("running database migrations")?;
            }
            let result = serve(store.clone(), &config).await;
            store.close().await;
            result
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
    }
}

async fn serve<S: EntityStore>(store: S, config: &CampusConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(store));

    if config.seed.demo_data {
        if let Some(summary) = seed_demo_data(&state.engine)
            .await
            .context("seeding demo data")?
        {
            info!(
                events = summary.events,
                students = summary.students,
                "Demo data ready"
            );
        }
    }

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&server_config, state)
        .await
        .context("running HTTP server")?;
    Ok(())
}
