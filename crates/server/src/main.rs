use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moderngov_core::{
    load_config, load_config_from_env, validate_config, Config, CouncilMatcher, ModernGovClient,
};
use moderngov_server::{create_router, AppState};

/// Default config file, used when MODERNGOV_CONFIG is unset.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load(std::env::var("MODERNGOV_CONFIG").ok().map(PathBuf::from))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Rate limit: {}ms per origin, timeout: {}s",
        config.client.rate_limit_ms, config.client.timeout_secs
    );
    if !config.resolver.overrides.is_empty() {
        info!(
            "{} endpoint override(s) configured",
            config.resolver.overrides.len()
        );
    }

    // Council reference list
    let matcher = CouncilMatcher::builtin().context("Failed to load council reference data")?;
    info!(
        "Loaded {} councils (dataset version {})",
        matcher.all().len(),
        matcher.dataset_version()
    );

    // Upstream client
    let client = ModernGovClient::new(&config.client, config.resolver.clone())
        .context("Failed to create HTTP client")?;

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(client),
        Arc::new(matcher),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Load config from an explicit path, or from the default path if present.
fn load(explicit: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = explicit {
        info!("Loading configuration from {:?}", path);
        return load_config(&path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if path.exists() {
        info!("Loading configuration from {:?}", path);
        return load_config(&path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    warn!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
    load_config_from_env().context("Failed to load config from environment")
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
}
