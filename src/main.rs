//! Gatehouse Server: session lifecycle and access-token gates over HTTP.
//!
//! Main entry point that wires the crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gatehouse_auth::{
    CredentialHasher, MemorySessionStore, PgSessionStore, SessionManager, SessionStore, TokenCodec,
};
use gatehouse_core::config::{AppConfig, SessionStoreKind};
use gatehouse_core::error::AppError;
use gatehouse_database::DatabasePool;
use gatehouse_database::repositories::SessionRepository;

#[tokio::main]
async fn main() {
    let env = std::env::var("GATEHOUSE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(kind = %e.kind, error = %e.message, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Gatehouse v{}", env!("CARGO_PKG_VERSION"));

    // ── Session store ────────────────────────────────────────────
    let (store, db_pool): (Arc<dyn SessionStore>, Option<DatabasePool>) = match config.session.store
    {
        SessionStoreKind::Postgres => {
            let db_pool = DatabasePool::connect(&config.database).await?;
            gatehouse_database::migration::run_migrations(db_pool.pool()).await?;

            let repo = Arc::new(SessionRepository::new(db_pool.pool().clone()));
            (Arc::new(PgSessionStore::new(repo)), Some(db_pool))
        }
        SessionStoreKind::Memory => {
            tracing::warn!("Using in-memory session store; sessions are lost on restart");
            (Arc::new(MemorySessionStore::new()), None)
        }
    };

    // ── Auth ─────────────────────────────────────────────────────
    let codec = Arc::new(TokenCodec::new(&config.auth)?);
    let hasher = Arc::new(CredentialHasher::new(&config.auth.hashing)?);
    let session_manager = SessionManager::new(codec, hasher, store);

    // ── HTTP server ──────────────────────────────────────────────
    let addr = config.server.bind_address();
    let app = gatehouse_api::build_router(gatehouse_api::AppState::new(config, session_manager));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Gatehouse listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(db_pool) = db_pool {
        db_pool.close().await;
    }

    tracing::info!("Gatehouse shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
