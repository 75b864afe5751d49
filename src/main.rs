//! Search aggregator service entry point

use anyhow::Result;
use search_aggregator::{
    config::Settings,
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so `debug` can pick the log level
    let (settings, source) = load_settings()?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting search-aggregator v{}", search_aggregator::VERSION);
    match source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    settings.validate()?;
    info!(
        "Aggregating {} with enrichment from {}",
        settings.aggregator.primary_collection, settings.aggregator.related_collection
    );

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;

    // Create application state
    let state = AppState::new(settings.clone(), client)?;

    let app = create_router(state);

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Server running at http://{}/search", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load settings from file or use defaults, then apply environment overrides
fn load_settings() -> Result<(Settings, Option<PathBuf>)> {
    let mut candidates = Vec::new();

    // Environment variable first
    if let Ok(path) = std::env::var("AGGREGATOR_SETTINGS_PATH") {
        candidates.push(PathBuf::from(path));
    }

    candidates.push(PathBuf::from("settings.yml"));
    candidates.push(PathBuf::from("config/settings.yml"));
    candidates.push(PathBuf::from("/etc/search-aggregator/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("search-aggregator/settings.yml"));
    }

    for path in candidates {
        if path.exists() {
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok((settings, Some(path)));
        }
    }

    let mut settings = Settings::default();
    settings.merge_env();
    Ok((settings, None))
}
