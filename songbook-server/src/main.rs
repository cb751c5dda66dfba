//! songbook-server - song catalog REST backend
//!
//! Settings come from the command line, the environment, an optional TOML
//! config file, and compiled defaults, in that order of priority.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use songbook_common::config::{load_toml_config, ConfigOverrides, ServerConfig};
use songbook_common::db::init_database;
use songbook_server::{build_router, cors_layer, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for songbook-server
#[derive(Parser, Debug)]
#[command(name = "songbook-server")]
#[command(about = "Song catalog REST backend")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "SONGBOOK_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SONGBOOK_PORT")]
    port: Option<u16>,

    /// SQLite database file (created if missing)
    #[arg(short, long, env = "SONGBOOK_DATABASE")]
    database: Option<PathBuf>,

    /// Origin allowed to make cross-origin requests (repeatable)
    #[arg(long = "allowed-origin", env = "SONGBOOK_ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// TOML config file
    #[arg(short, long, env = "SONGBOOK_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            allowed_origins: Some(self.allowed_origins.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songbook_server=info,songbook_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any slow startup work
    info!(
        "Starting songbook-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let file = load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;
    let config = ServerConfig::resolve(args.overrides(), file);

    info!("Database path: {}", config.database.display());
    let pool = init_database(&config.database)
        .await
        .context("Failed to initialize database")?;

    if config.allowed_origins.is_empty() {
        info!("CORS: any origin allowed");
    } else {
        info!("CORS: allowed origins {:?}", config.allowed_origins);
    }
    let cors = cors_layer(&config.allowed_origins).context("Invalid CORS configuration")?;

    let app = build_router(AppState::new(pool.clone())).layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address()))?;
    info!("songbook-server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
///
/// A handler that cannot be installed is logged and never fires, so the
/// server keeps running rather than stopping at once.
async fn shutdown_signal() {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "Ctrl+C",
            Err(e) => {
                warn!("Ctrl+C handler unavailable: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };
    info!("Received {}, draining connections", received);
}
