// tests/common/mod.rs
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::auth::service::AuthService;
use crate::auth::store::TokenStore;
use crate::config::settings::{MetricsConfig, RateLimitConfig, SimulationConfig};
use crate::observability::metrics::get_metrics;
use crate::report::service::ReportService;
use crate::report::template::{ReportKind, ReportTemplate};
use crate::server::rate_limit::RateLimiter;
use crate::server::server::{router, AppState};
use crate::simulation::engine::SimulationEngine;
use crate::simulation::random::RandomSource;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn pf_payload() -> Value {
    json!({
        "reports": [{
            "reportName": "TEMPLATE_PF",
            "registration": {
                "documentNumber": "00000000000",
                "consumerName": "JOAO DA SILVA",
                "birthDate": "1980-01-01"
            },
            "negativeData": {"pefin": {"summary": {"count": 0, "balance": 0.0}}},
            "score": {"score": 720, "range": "B"}
        }]
    })
}

pub fn pj_payload() -> Value {
    json!({
        "reports": [{
            "reportName": "TEMPLATE_PJ",
            "registration": {
                "documentId": "00000000000000",
                "companyName": "EMPRESA TESTE LTDA"
            },
            "facts": {"lawsuits": {"summary": {"count": 0}}}
        }]
    })
}

pub fn no_delay(error_chance_percent: u8) -> SimulationConfig {
    SimulationConfig {
        min_delay_ms: 0,
        max_delay_ms: 0,
        error_chance_percent,
    }
}

pub fn report_service(
    settings: SimulationConfig,
    random: Option<Arc<dyn RandomSource>>,
    with_pf: bool,
    with_pj: bool,
) -> ReportService {
    let engine = match random {
        Some(random) => SimulationEngine::new(settings, random),
        None => SimulationEngine::with_thread_random(settings),
    };
    ReportService::new(
        with_pf.then(|| ReportTemplate::new(ReportKind::Person, pf_payload())),
        with_pj.then(|| ReportTemplate::new(ReportKind::Business, pj_payload())),
        engine,
    )
}

pub async fn app_state(ttl_seconds: u64, reports: ReportService, rate_limit: RateLimitConfig) -> AppState {
    AppState::new(
        Arc::new(AuthService::new("test-secret", ttl_seconds, TokenStore::new())),
        Arc::new(reports),
        RateLimiter::new(&rate_limit),
        get_metrics().await,
    )
}

/// Serve a full application router on an ephemeral port.
pub async fn spawn_app(state: AppState) -> (JoinHandle<()>, String) {
    let app = router(state, &MetricsConfig::default());
    let (handle, addr) = spawn_axum(app).await;
    (handle, format!("http://{}", addr))
}
