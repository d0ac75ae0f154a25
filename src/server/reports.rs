use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::errors::ReportError;
use crate::report::template::ReportKind;
use crate::server::server::AppState;
use crate::utils::constants::DOCUMENT_ID_HEADER;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "reportName")]
    pub report_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let body = ReportErrorBody {
            error: "Failed to generate report",
            message: self.to_string(),
            code: self.code(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Validated inputs of a report request.
#[derive(Debug, PartialEq, Eq)]
pub struct ReportRequest {
    pub document_id: String,
    pub report_name: String,
}

/// Checks the document id header and the report name for `kind`.
pub fn validate_report_request(
    kind: ReportKind,
    document_id: Option<&str>,
    report_name: Option<&str>,
) -> Result<ReportRequest, String> {
    let document_id = match document_id {
        None => return Err("\"documentId\" is required".to_string()),
        Some("") => return Err("\"documentId\" is not allowed to be empty".to_string()),
        Some(id) => id,
    };
    let report_name = match report_name {
        None => return Err("\"reportName\" is required".to_string()),
        Some(name) if name != kind.report_name() => {
            return Err(format!("\"reportName\" must be [{}]", kind.report_name()))
        }
        Some(name) => name,
    };

    Ok(ReportRequest {
        document_id: document_id.to_owned(),
        report_name: report_name.to_owned(),
    })
}

async fn handle_report(
    kind: ReportKind,
    state: AppState,
    headers: HeaderMap,
    query: ReportQuery,
) -> Response {
    let document_id = headers
        .get(DOCUMENT_ID_HEADER)
        .and_then(|v| v.to_str().ok());

    let request = match validate_report_request(kind, document_id, query.report_name.as_deref()) {
        Ok(request) => request,
        Err(message) => {
            warn!(error = %message, "invalid {} report request", kind);
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response();
        }
    };

    match state
        .reports
        .get_report(kind, &request.document_id, &request.report_name)
        .await
    {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!(status = e.status_code().as_u16(), "failed to generate {} report: {}", kind, e);
            e.into_response()
        }
    }
}

pub async fn pf_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Response {
    handle_report(ReportKind::Person, state, headers, query).await
}

pub async fn pj_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Response {
    handle_report(ReportKind::Business, state, headers, query).await
}
