mod api;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookvox_core::{
    load_config, validate_config, ArtifactStore, Config, ConversionEngine, JobTracker,
    SimulatedEngine,
};

use api::create_router;
use state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
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

    // Determine config path
    let config_path = std::env::var("BOOKVOX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; the front-end runs fine with defaults when no
    // config file is present
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        warn!(
            "No configuration file at {:?}, using defaults",
            config_path
        );
        Config::default()
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Upload directory: {:?}", config.storage.upload_dir);
    info!("Output directory: {:?}", config.storage.output_dir);

    // Create artifact store and holding directories
    let store = ArtifactStore::new(
        config.storage.upload_dir.clone(),
        config.storage.output_dir.clone(),
    );
    store
        .ensure_dirs()
        .await
        .context("Failed to create storage directories")?;

    // Create conversion engine
    let engine: Arc<dyn ConversionEngine> =
        Arc::new(SimulatedEngine::new(config.engine.clone()));
    info!(
        "Using conversion engine: {} (available: {})",
        engine.name(),
        engine.available()
    );

    // Create job tracker
    let jobs = Arc::new(JobTracker::new());

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), store, engine, jobs));

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

    info!("Server shutting down...");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
