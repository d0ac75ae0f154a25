use http::StatusCode;
use thiserror::Error;

use crate::report::template::ReportKind;
use crate::simulation::catalog::SyntheticError;

/// A presented token string could not be turned back into a signed token.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token body is malformed: {0}")]
    Body(#[from] serde_json::Error),
}

/// Issuing a token failed before anything was stored.
#[derive(Debug, Error)]
pub enum TokenGenerationError {
    #[error("Failed to generate token")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to generate token")]
    InvalidKey,
}

/// Failures surfaced by report generation.
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    #[error("{} payload not available", .0.label())]
    PayloadUnavailable(ReportKind),
    #[error("{}", .0.message)]
    Simulated(SyntheticError),
}

impl ReportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::PayloadUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ReportError::Simulated(err) => {
                StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            ReportError::PayloadUnavailable(_) => None,
            ReportError::Simulated(err) => Some(err.code),
        }
    }
}
