//! CouponDrop Server — round-robin coupon distribution
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use coupondrop_core::config::AppConfig;
use coupondrop_core::error::AppError;
use coupondrop_ledger::RestrictionSweeper;

/// Command-line arguments for the server.
#[derive(Debug, Parser)]
#[command(name = "coupondrop-server", version, about = "Serve coupons round-robin")]
struct Cli {
    /// Directory holding `default.toml` and `<env>.toml`
    #[arg(long, env = "COUPONDROP_CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Environment overlay to load on top of the defaults
    #[arg(long, env = "COUPONDROP_ENV", default_value = "development")]
    env: String,

    /// Override the server host
    #[arg(long)]
    host: Option<String>,

    /// Override the server port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment, then apply CLI overrides
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(&cli.config_dir, &cli.env)?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref host) = cli.host {
        config.server.host = host.clone();
    }

    Ok(config)
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
                .with_thread_ids(true)
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

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CouponDrop v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Ledger, coordinator, and shared state ────────────
    let state = coupondrop_api::AppState::from_config(config.clone())?;

    // ── Step 2: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 3: Start background maintenance ─────────────────────
    let mut background = Vec::new();

    if config.coupons.sweep_interval_minutes > 0 {
        let interval = Duration::from_secs(config.coupons.sweep_interval_minutes * 60);
        let sweeper = RestrictionSweeper::new(state.ledger(), interval);
        let cancel = shutdown_rx.clone();
        background.push(tokio::spawn(async move {
            sweeper.run(cancel).await;
        }));
    } else {
        tracing::info!("Restriction sweeper disabled");
    }

    if config.rate_limit.enabled {
        // A bucket is full again one window after its last use.
        let interval = Duration::from_secs(config.rate_limit.window_seconds.max(1));
        let limiter = state.rate_limiter.clone();
        let cancel = shutdown_rx.clone();
        background.push(tokio::spawn(async move {
            limiter.run_pruner(interval, cancel).await;
        }));
    }

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app = coupondrop_api::build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("CouponDrop server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 6: Wait for background tasks ────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    for handle in background {
        let _ = tokio::time::timeout(grace, handle).await;
    }

    tracing::info!("CouponDrop server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
