use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use mock_bureau::auth::service::AuthService;
use mock_bureau::auth::store::TokenStore;
use mock_bureau::auth::sweeper::spawn_sweeper;
use mock_bureau::observability::metrics::get_metrics;
use mock_bureau::report::service::ReportService;
use mock_bureau::server::rate_limit::RateLimiter;
use mock_bureau::server::server::{self, AppState};
use mock_bureau::simulation::engine::SimulationEngine;
use mock_bureau::utils::config_loader;
use mock_bureau::utils::constants::DEFAULT_CONFIG_PATH;
use mock_bureau::utils::logging::{self, LogLevel};
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config, start logging
    // -------------------------------

    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config.settings.logging, args.log_level);

    let metrics = get_metrics().await;

    // -------------------------------
    // 2. Load report templates (never fatal)
    // -------------------------------

    let engine = SimulationEngine::with_thread_random(service_config.simulation.clone());
    let reports = Arc::new(ReportService::initialize(&service_config.payloads, engine).await);
    let status = reports.payload_status();
    if !status.pf || !status.pj {
        warn!(pf = status.pf, pj = status.pj, "starting with missing payloads");
    }

    // -------------------------------
    // 3. Token store, auth service, sweeper
    // -------------------------------

    let security = &service_config.security;
    let auth = Arc::new(AuthService::new(
        &security.secret_key,
        security.token_ttl_seconds,
        TokenStore::new(),
    ));
    let rate_limiter = RateLimiter::new(&service_config.rate_limit);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(
        auth.clone(),
        Some(rate_limiter.clone()),
        Duration::from_secs(security.sweep_interval_seconds),
        shutdown_rx,
    );

    // -------------------------------
    // 4. Serve until SIGINT / SIGTERM
    // -------------------------------

    let state = AppState::new(auth, reports, rate_limiter, metrics);
    info!("service starting...");
    let served = server::start(
        &service_config.settings.server,
        &service_config.settings.metrics,
        state,
        shutdown_signal(),
    )
    .await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        warn!("sweeper task ended abnormally: {}", e);
    }

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for SIGINT: {}", e);
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
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT signal received: closing HTTP server"),
        _ = terminate => info!("SIGTERM signal received: closing HTTP server"),
    }
}
