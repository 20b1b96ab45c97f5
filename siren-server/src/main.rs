//! siren - emergency report intake service
//!
//! Accepts free-text reports, normalizes them into incident records through
//! the Gemini API, stores them in SQLite and serves them per department.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use siren_common::config::{load_optional_toml_config, ConfigOverrides, ServerConfig};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use siren_server::db::{self, SqliteCaseStore};
use siren_server::oracle::GeminiClient;
use siren_server::services::CaseBridge;
use siren_server::{build_router, AppState};

/// Command-line arguments for siren
#[derive(Parser, Debug)]
#[command(name = "siren")]
#[command(about = "Emergency report intake and query service")]
#[command(version)]
struct Args {
    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(short, long, env = "SIREN_BIND")]
    bind: Option<String>,

    /// Database connection string, e.g. sqlite://siren.db?mode=rwc
    #[arg(long, env = "SIREN_DATABASE_URL")]
    database_url: Option<String>,

    /// Gemini API key
    #[arg(long, env = "SIREN_GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// TOML config file (default: <config dir>/siren/siren.toml if present)
    #[arg(short, long, env = "SIREN_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file with a case object or an array of cases to store before serving
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = load_optional_toml_config(args.config.as_deref())?;

    // RUST_LOG overrides the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("siren={0},siren_server={0},tower_http=info", toml.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting siren v{}", env!("CARGO_PKG_VERSION"));

    let overrides = ConfigOverrides {
        bind: args.bind,
        database_url: args.database_url,
        api_key: args.gemini_api_key,
    };
    let config = ServerConfig::resolve(overrides, toml)?;

    info!("Database: {}", config.database_url);
    let pool = match db::init_database_pool(&config.database_url).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };
    let store = Arc::new(SqliteCaseStore::new(pool));

    let oracle = Arc::new(
        GeminiClient::new(config.oracle.clone()).context("Failed to initialize oracle client")?,
    );
    info!(
        "Oracle endpoint: {} (timeout {:?})",
        oracle.endpoint(),
        config.oracle.timeout
    );

    if let Some(seed_path) = &args.seed {
        seed_cases(&CaseBridge::new(store.clone()), seed_path).await?;
    }

    let state = AppState::new(store, oracle);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!("siren listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Store the cases in a seed file through the bridge
async fn seed_cases(bridge: &CaseBridge, path: &std::path::Path) -> Result<()> {
    let payload = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    let saved = bridge
        .ingest_seed(&payload)
        .await
        .with_context(|| format!("Failed to seed cases from {}", path.display()))?;

    info!("✓ Seeded {} case(s) from {}", saved.len(), path.display());
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
