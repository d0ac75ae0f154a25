use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token metrics
    pub tokens_issued: IntCounter,
    pub token_validations: IntCounterVec,
    pub tokens_swept: IntCounter,
    pub active_tokens: IntGauge,

    // Report metrics
    pub report_requests: IntCounterVec,
    pub simulated_errors: IntCounterVec,
    pub report_delay: HistogramVec,

    // Http
    pub http_requests: IntCounterVec,
    pub rate_limited: IntCounter,

    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("mockbureau".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            tokens_issued: IntCounter::new("tokens_issued_total", "Bearer tokens issued").unwrap(),
            token_validations: IntCounterVec::new(Opts::new("token_validations_total", "Token validations by result"), &["result"]).unwrap(),
            tokens_swept: IntCounter::new("tokens_swept_total", "Expired tokens removed by the periodic sweep").unwrap(),
            active_tokens: IntGauge::new("active_tokens", "Tokens currently held in the store").unwrap(),

            report_requests: IntCounterVec::new(Opts::new("report_requests_total", "Report requests by kind and outcome"), &["kind", "outcome"]).unwrap(),
            simulated_errors: IntCounterVec::new(Opts::new("simulated_errors_total", "Injected errors by kind and code"), &["kind", "code"]).unwrap(),
            report_delay: HistogramVec::new(HistogramOpts::new("report_delay_seconds", "Simulated report generation delay").buckets(vec![0.0, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 45.0, 60.0]), &["kind"]).unwrap(),

            http_requests: IntCounterVec::new(Opts::new("http_requests_total", "Http requests by method and status"), &["method", "status"]).unwrap(),
            rate_limited: IntCounter::new("rate_limited_requests_total", "Requests rejected by the rate limiter").unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.tokens_issued.clone())).unwrap();
        reg.register(Box::new(metrics.token_validations.clone())).unwrap();
        reg.register(Box::new(metrics.tokens_swept.clone())).unwrap();
        reg.register(Box::new(metrics.active_tokens.clone())).unwrap();
        reg.register(Box::new(metrics.report_requests.clone())).unwrap();
        reg.register(Box::new(metrics.simulated_errors.clone())).unwrap();
        reg.register(Box::new(metrics.report_delay.clone())).unwrap();
        reg.register(Box::new(metrics.http_requests.clone())).unwrap();
        reg.register(Box::new(metrics.rate_limited.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
