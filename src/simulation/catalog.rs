use serde::Serialize;

/// An intentionally injected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyntheticError {
    pub status: u16,
    pub message: &'static str,
    pub code: &'static str,
}

pub const ERROR_CATALOG: [SyntheticError; 6] = [
    SyntheticError {
        status: 400,
        message: "Bad Request - Invalid document format",
        code: "INVALID_DOCUMENT",
    },
    SyntheticError {
        status: 401,
        message: "Unauthorized - Token expired or invalid",
        code: "TOKEN_EXPIRED",
    },
    SyntheticError {
        status: 403,
        message: "Forbidden - Insufficient permissions",
        code: "INSUFFICIENT_PERMISSIONS",
    },
    SyntheticError {
        status: 429,
        message: "Too Many Requests - Rate limit exceeded",
        code: "RATE_LIMIT_EXCEEDED",
    },
    SyntheticError {
        status: 500,
        message: "Internal Server Error - Service temporarily unavailable",
        code: "SERVICE_ERROR",
    },
    SyntheticError {
        status: 503,
        message: "Service Unavailable - External service down",
        code: "EXTERNAL_SERVICE_DOWN",
    },
];
