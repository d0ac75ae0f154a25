use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Person (PF) or business (PJ) report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Person,
    Business,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Person => "PF",
            ReportKind::Business => "PJ",
        }
    }

    /// Field under `reports[0].registration` receiving the document id.
    pub fn document_field(&self) -> &'static str {
        match self {
            ReportKind::Person => "documentNumber",
            ReportKind::Business => "documentId",
        }
    }

    /// The only report name accepted for this kind.
    pub fn report_name(&self) -> &'static str {
        match self {
            ReportKind::Person => "RELATORIO_BASICO_PF_PME",
            ReportKind::Business => "RELATORIO_BASICO_PJ_PME",
        }
    }

    /// Masks a document id for logging.
    pub fn mask_document(&self, document_id: &str) -> String {
        let visible = match self {
            ReportKind::Person => 3,
            ReportKind::Business => 8,
        };
        let prefix: String = document_id.chars().take(visible).collect();
        format!("{}***", prefix)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const REGISTRATION_POINTER: &str = "/reports/0/registration";
const FIRST_REPORT_POINTER: &str = "/reports/0";

/// Read-only report payload loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTemplate {
    kind: ReportKind,
    root: Value,
}

impl ReportTemplate {
    pub fn new(kind: ReportKind, root: Value) -> Self {
        Self { kind, root }
    }

    pub async fn load(kind: ReportKind, path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {} payload from {}", kind, path.display()))?;
        let root: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {} payload from {}", kind, path.display()))?;
        if root.is_null() {
            bail!("{} payload in {} is null", kind, path.display());
        }
        Ok(Self::new(kind, root))
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Deep copy with the document id and report name written in.
    ///
    /// Both fields are only written when `reports[0].registration` exists.
    pub fn instantiate(&self, document_id: &str, report_name: &str) -> Value {
        let mut copy = self.root.clone();

        let has_registration = matches!(
            copy.pointer(REGISTRATION_POINTER),
            Some(Value::Object(_))
        );
        if !has_registration {
            return copy;
        }

        if let Some(Value::Object(registration)) = copy.pointer_mut(REGISTRATION_POINTER) {
            registration.insert(
                self.kind.document_field().to_owned(),
                Value::String(document_id.to_owned()),
            );
        }
        if let Some(Value::Object(report)) = copy.pointer_mut(FIRST_REPORT_POINTER) {
            report.insert("reportName".to_owned(), Value::String(report_name.to_owned()));
        }

        copy
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn person_template() -> ReportTemplate {
        ReportTemplate::new(
            ReportKind::Person,
            json!({
                "reports": [{
                    "reportName": "TEMPLATE",
                    "registration": {"documentNumber": "00000000000", "consumerName": "FULANO"}
                }],
                "optionalFeatures": {}
            }),
        )
    }

    #[test]
    fn instantiate_rewrites_person_fields() {
        let template = person_template();
        let report = template.instantiate("12345678900", "RELATORIO_BASICO_PF_PME");

        assert_eq!(report["reports"][0]["registration"]["documentNumber"], "12345678900");
        assert_eq!(report["reports"][0]["reportName"], "RELATORIO_BASICO_PF_PME");
        assert_eq!(report["reports"][0]["registration"]["consumerName"], "FULANO");
        // template untouched
        assert_eq!(template, person_template());
    }

    #[test]
    fn instantiate_uses_document_id_for_business() {
        let template = ReportTemplate::new(
            ReportKind::Business,
            json!({"reports": [{"registration": {"companyName": "ACME"}}]}),
        );
        let report = template.instantiate("12345678000190", "RELATORIO_BASICO_PJ_PME");

        assert_eq!(report["reports"][0]["registration"]["documentId"], "12345678000190");
        assert!(report["reports"][0]["registration"].get("documentNumber").is_none());
        assert_eq!(report["reports"][0]["reportName"], "RELATORIO_BASICO_PJ_PME");
    }

    #[test]
    fn instantiate_leaves_unexpected_shapes_alone() {
        let template = ReportTemplate::new(ReportKind::Person, json!({"reports": []}));
        assert_eq!(template.instantiate("1", "x"), json!({"reports": []}));

        let template = ReportTemplate::new(ReportKind::Person, json!({"reports": [{"reportName": "T"}]}));
        assert_eq!(
            template.instantiate("1", "RELATORIO_BASICO_PF_PME"),
            json!({"reports": [{"reportName": "T"}]})
        );

        let template = ReportTemplate::new(
            ReportKind::Business,
            json!({"reports": [{"reportName": "T", "registration": "flat"}]}),
        );
        assert_eq!(
            template.instantiate("1", "RELATORIO_BASICO_PJ_PME"),
            json!({"reports": [{"reportName": "T", "registration": "flat"}]})
        );
    }

    #[test]
    fn masks_document_ids() {
        assert_eq!(ReportKind::Person.mask_document("12345678900"), "123***");
        assert_eq!(ReportKind::Business.mask_document("12345678000190"), "12345678***");
        assert_eq!(ReportKind::Business.mask_document("12"), "12***");
    }

    #[tokio::test]
    async fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(ReportTemplate::load(ReportKind::Person, &missing).await.is_err());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert!(ReportTemplate::load(ReportKind::Person, &broken).await.is_err());

        let null = dir.path().join("null.json");
        std::fs::write(&null, "null").unwrap();
        assert!(ReportTemplate::load(ReportKind::Person, &null).await.is_err());

        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"reports":[]}"#).unwrap();
        let template = ReportTemplate::load(ReportKind::Person, &good).await.unwrap();
        assert_eq!(template.root(), &json!({"reports": []}));
    }
}
