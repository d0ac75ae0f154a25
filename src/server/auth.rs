use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::server::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: String,
    pub scope: [&'static str; 2],
}

/// First 16 hex chars of SHA-256 over the full authorization header.
pub fn derive_client_id(authorization: &str) -> String {
    let digest = hex::encode(Sha256::digest(authorization.as_bytes()));
    digest[..16].to_owned()
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(auth_header) = authorization(&headers).filter(|h| h.starts_with("Basic ")) else {
        warn!("invalid login credentials format");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Credenciais inválidas",
                "details": "Authorization header deve ser fornecido no formato: Basic <base64>",
            })),
        )
            .into_response();
    };

    let client_id = derive_client_id(auth_header);
    match state.auth.issue_token(&client_id).await {
        Ok(issued) => {
            info!(client_id = %client_id, "login successful");
            Json(LoginResponse {
                access_token: issued.token,
                token_type: "Bearer",
                expires_in: issued.ttl_seconds.to_string(),
                scope: ["read", "write"],
            })
            .into_response()
        }
        Err(e) => {
            error!("login failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate token" })),
            )
                .into_response()
        }
    }
}

/// Rejects requests without a valid `Bearer` token.
pub async fn require_bearer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(auth_header) = authorization(req.headers()).filter(|h| h.starts_with("Bearer ")) else {
        warn!("missing or invalid authorization header");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Token não fornecido",
                "details": "Authorization header deve ser fornecido no formato: Bearer <token>",
            })),
        )
            .into_response();
    };

    let token = auth_header.split(' ').nth(1).unwrap_or_default().to_owned();
    if !state.auth.validate_token(&token).await {
        warn!("invalid or expired token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Token inválido ou expirado" })),
        )
            .into_response();
    }

    next.run(req).await
}
