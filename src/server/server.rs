use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::auth::service::AuthService;
use crate::config::settings::{MetricsConfig, ServerConfig};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::report::service::ReportService;
use crate::server::rate_limit::RateLimiter;
use crate::server::{auth, health, rate_limit, reports, request_logger};
use crate::utils::constants::{HEALTH_PATH, LOGIN_PATH, PF_REPORT_PATH, PJ_REPORT_PATH};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub reports: Arc<ReportService>,
    pub rate_limiter: RateLimiter,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        reports: Arc<ReportService>,
        rate_limiter: RateLimiter,
        metrics: &Metrics,
    ) -> Self {
        Self {
            auth,
            reports,
            rate_limiter,
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }
}

/// Builds the full router: login, protected report routes, health, metrics.
pub fn router(state: AppState, metrics_config: &MetricsConfig) -> Router {
    let protected = Router::new()
        .route(PF_REPORT_PATH, get(reports::pf_report))
        .route(PJ_REPORT_PATH, get(reports::pj_report))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer));

    Router::new()
        .route(LOGIN_PATH, post(auth::login))
        .merge(protected)
        .route(HEALTH_PATH, get(health::check))
        .merge(state.metrics_state.router(metrics_config))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::rate_limit))
        .layer(middleware::from_fn(request_logger::log_request))
        .with_state(state)
}

async fn not_found(req: Request) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "path": req.uri().to_string(),
        })),
    )
}

/// Binds and serves until `shutdown` resolves.
pub async fn start<F>(
    server_config: &ServerConfig,
    metrics_config: &MetricsConfig,
    state: AppState,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics = get_metrics().await;
    let app = router(state, metrics_config);

    let bind_addr = format!("{}:{}", server_config.host, server_config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("mock bureau server running on {}", bind_addr);
    info!("available endpoints:");
    info!("  POST {}", LOGIN_PATH);
    info!("  GET  {}", PF_REPORT_PATH);
    info!("  GET  {}", PJ_REPORT_PATH);
    info!("  GET  {}", HEALTH_PATH);
    if metrics_config.is_enabled {
        info!("  GET  {}", metrics_config.path);
    }

    metrics.up.set(1);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .context("http server failed")?;
    metrics.up.set(0);

    info!("http server stopped");
    Ok(())
}
