//! Affiliate Studio (studio-ui) - Main entry point
//!
//! Local web server for affiliate product captions, zip exports and
//! video view tracking.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use studio_common::config::{
    default_config_path, prepare_data_folder, resolve_data_folder, TomlConfig, DATA_FOLDER_ENV,
};
use studio_common::db::init_database;
use studio_ui::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for studio-ui
#[derive(Parser, Debug)]
#[command(name = "studio-ui")]
#[command(about = "Affiliate Studio: captions, hashtags and exports for affiliate products")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "STUDIO_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Folder holding the database
    #[arg(short, long)]
    data_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "STUDIO_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let (config, config_source) = TomlConfig::load_with_source(config_path.as_deref());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Affiliate Studio (studio-ui) v{} built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let data_folder = resolve_data_folder(args.data_folder.as_deref(), DATA_FOLDER_ENV, &config);
    let db_path = prepare_data_folder(&data_folder)
        .with_context(|| format!("Failed to prepare data folder {}", data_folder.display()))?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let (host, port) = config.bind_address(args.host, args.port);
    let state =
        AppState::new(pool, config.network.clone()).context("Failed to build HTTP client")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", host, port))?;
    info!("studio-ui listening on http://{}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
