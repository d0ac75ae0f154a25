use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::settings::SimulationConfig;
use crate::errors::ReportError;
use crate::observability::metrics::get_metrics;
use crate::report::template::{ReportKind, ReportTemplate};
use crate::simulation::catalog::{SyntheticError, ERROR_CATALOG};
use crate::simulation::random::{RandomSource, ThreadRandom};

/// What a single report request resolves to before any waiting happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Fail(SyntheticError),
    Succeed { delay_ms: u64 },
}

/// Layers random error injection and delay over static payload delivery.
#[derive(Clone)]
pub struct SimulationEngine {
    settings: SimulationConfig,
    random: Arc<dyn RandomSource>,
}

impl SimulationEngine {
    pub fn new(settings: SimulationConfig, random: Arc<dyn RandomSource>) -> Self {
        Self { settings, random }
    }

    pub fn with_thread_random(settings: SimulationConfig) -> Self {
        Self::new(settings, Arc::new(ThreadRandom))
    }

    pub fn decide(&self) -> Outcome {
        let roll = self.random.below(100);
        if roll < u64::from(self.settings.error_chance_percent) {
            let index = self.random.below(ERROR_CATALOG.len() as u64) as usize;
            return Outcome::Fail(ERROR_CATALOG[index]);
        }

        let delay_ms = self
            .random
            .between(self.settings.min_delay_ms, self.settings.max_delay_ms);
        Outcome::Succeed { delay_ms }
    }

    /// Produces one report from `template`, or the failure the draw picked.
    ///
    /// A missing template fails before any random draw is made.
    pub async fn run(
        &self,
        kind: ReportKind,
        template: Option<&ReportTemplate>,
        document_id: &str,
        report_name: &str,
    ) -> Result<Value, ReportError> {
        let metrics = get_metrics().await;

        let Some(template) = template else {
            metrics
                .report_requests
                .with_label_values(&[kind.label(), "unavailable"])
                .inc();
            return Err(ReportError::PayloadUnavailable(kind));
        };

        match self.decide() {
            Outcome::Fail(error) => {
                warn!(
                    document_id = %kind.mask_document(document_id),
                    report_name = %report_name,
                    error_code = %error.code,
                    status = error.status,
                    "generating random error for {} report",
                    kind
                );
                metrics
                    .simulated_errors
                    .with_label_values(&[kind.label(), error.code])
                    .inc();
                metrics
                    .report_requests
                    .with_label_values(&[kind.label(), "simulated_error"])
                    .inc();
                Err(ReportError::Simulated(error))
            }
            Outcome::Succeed { delay_ms } => {
                info!(
                    document_id = %kind.mask_document(document_id),
                    report_name = %report_name,
                    "generating {} report with {}ms delay",
                    kind,
                    delay_ms
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;

                metrics
                    .report_delay
                    .with_label_values(&[kind.label()])
                    .observe(delay_ms as f64 / 1000.0);
                metrics
                    .report_requests
                    .with_label_values(&[kind.label(), "success"])
                    .inc();
                Ok(template.instantiate(document_id, report_name))
            }
        }
    }
}
