//! Rolodex contact service.
//!
//! Serves a paginated contact directory with per-contact photo upload over
//! HTTP. Contacts live in PostgreSQL when a database URL is configured and in
//! process memory otherwise; photos are written to a local directory and
//! served back under a configurable URL prefix.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rolodex_config::{
    Config, ConfigLoad, ConfigLoader, ConfigLoaderOptions, ConfigWarnings,
};
use rolodex_core::{
    ContactRepository, ContactService, InMemoryContactRepository, MIGRATOR,
    PhotoStore, PostgresContactRepository,
};
use rolodex_server::{AppState, create_app};

const DATABASE_MAX_CONNECTIONS: u32 = 10;

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "rolodex-server")]
#[command(about = "Contact directory with photo uploads")]
struct Cli {
    /// Path to a rolodex.toml configuration file
    #[arg(short, long, env = "ROLODEX_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: cli.config.clone(),
        env_file: cli.env_file.clone(),
    })
    .load()
    .context("failed to load configuration")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration file loaded");
    }
    log_config_warnings(&warnings);

    let contacts = connect_repository(&config).await?;

    let photos = PhotoStore::new(config.photos.directory.clone())
        .with_url_prefix(config.photos.url_prefix.clone())
        .with_public_base_url(config.photos.public_base_url.clone());
    info!(
        directory = %photos.directory().display(),
        url_prefix = photos.url_prefix(),
        "photo storage configured"
    );

    let service = ContactService::new(contacts, Arc::new(photos))
        .with_photo_cleanup(config.photos.remove_on_delete);

    let bind_address = config.bind_address();
    let app = create_app(AppState::new(service, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!("Starting Rolodex server on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn connect_repository(
    config: &Config,
) -> anyhow::Result<Arc<dyn ContactRepository>> {
    let Some(url) = config.database.url.as_deref() else {
        warn!("No database configured; contacts will not survive a restart");
        return Ok(Arc::new(InMemoryContactRepository::new()));
    };

    info!("Connecting to PostgreSQL");
    let pool = PgPoolOptions::new()
        .max_connections(DATABASE_MAX_CONNECTIONS)
        .connect(url)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("Successfully connected to PostgreSQL");

    MIGRATOR
        .run(&pool)
        .await
        .context("failed to run database migrations")?;
    info!("Database schema initialized successfully");

    Ok(Arc::new(PostgresContactRepository::new(pool)))
}

fn log_config_warnings(warnings: &ConfigWarnings) {
    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => warn!(hint = %hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
