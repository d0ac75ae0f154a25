use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::config::settings::PayloadsConfig;
use crate::errors::ReportError;
use crate::report::template::{ReportKind, ReportTemplate};
use crate::simulation::engine::SimulationEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayloadStatus {
    pub pf: bool,
    pub pj: bool,
}

/// Owns the PF and PJ templates for the lifetime of the process.
///
/// A template that failed to load stays `None`; every request for that
/// kind then fails with [`ReportError::PayloadUnavailable`].
pub struct ReportService {
    person: Option<ReportTemplate>,
    business: Option<ReportTemplate>,
    engine: SimulationEngine,
}

impl ReportService {
    pub fn new(
        person: Option<ReportTemplate>,
        business: Option<ReportTemplate>,
        engine: SimulationEngine,
    ) -> Self {
        Self {
            person,
            business,
            engine,
        }
    }

    /// Loads both templates concurrently. Load failures are logged, not fatal.
    pub async fn initialize(payloads: &PayloadsConfig, engine: SimulationEngine) -> Self {
        let (person, business) = tokio::join!(
            load_or_log(ReportKind::Person, Path::new(&payloads.pf)),
            load_or_log(ReportKind::Business, Path::new(&payloads.pj)),
        );
        let service = Self::new(person, business, engine);

        let status = service.payload_status();
        info!(pf = status.pf, pj = status.pj, "payloads loaded");
        service
    }

    pub async fn get_pf_report(&self, document_id: &str, report_name: &str) -> Result<Value, ReportError> {
        self.engine
            .run(ReportKind::Person, self.person.as_ref(), document_id, report_name)
            .await
    }

    pub async fn get_pj_report(&self, document_id: &str, report_name: &str) -> Result<Value, ReportError> {
        self.engine
            .run(ReportKind::Business, self.business.as_ref(), document_id, report_name)
            .await
    }

    pub async fn get_report(
        &self,
        kind: ReportKind,
        document_id: &str,
        report_name: &str,
    ) -> Result<Value, ReportError> {
        match kind {
            ReportKind::Person => self.get_pf_report(document_id, report_name).await,
            ReportKind::Business => self.get_pj_report(document_id, report_name).await,
        }
    }

    pub fn payload_status(&self) -> PayloadStatus {
        PayloadStatus {
            pf: self.person.is_some(),
            pj: self.business.is_some(),
        }
    }

    pub fn template(&self, kind: ReportKind) -> Option<&ReportTemplate> {
        match kind {
            ReportKind::Person => self.person.as_ref(),
            ReportKind::Business => self.business.as_ref(),
        }
    }
}

async fn load_or_log(kind: ReportKind, path: &Path) -> Option<ReportTemplate> {
    ReportTemplate::load(kind, path)
        .await
        .inspect_err(|e| error!("error loading {} payload: {:#}", kind, e))
        .ok()
}
