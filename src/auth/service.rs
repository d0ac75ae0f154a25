use tracing::{debug, error, info, warn};

use crate::auth::codec::TokenCodec;
use crate::auth::store::TokenStore;
use crate::auth::token::{IssuedToken, TokenPayload};
use crate::errors::TokenGenerationError;
use crate::helpers::time::now_ms;
use crate::observability::metrics::get_metrics;

/// Issues and validates bearer tokens against the shared [`TokenStore`].
///
/// `client_id` is treated as an opaque string; deriving it from the caller's
/// credentials happens at the http boundary.
#[derive(Clone)]
pub struct AuthService {
    codec: TokenCodec,
    store: TokenStore,
    ttl_seconds: u64,
}

impl AuthService {
    pub fn new(secret_key: &str, ttl_seconds: u64, store: TokenStore) -> Self {
        Self {
            codec: TokenCodec::new(secret_key),
            store,
            ttl_seconds,
        }
    }

    pub async fn issue_token(&self, client_id: &str) -> Result<IssuedToken, TokenGenerationError> {
        let payload = TokenPayload::new(client_id.to_owned(), now_ms(), self.ttl_seconds);

        let token = self.codec.encode(&payload).inspect_err(|e| {
            error!("error generating token for client {}: {:?}", client_id, e);
        })?;
        self.store.insert(token.clone(), payload).await;

        let metrics = get_metrics().await;
        metrics.tokens_issued.inc();
        metrics.active_tokens.set(self.store.count().await as i64);
        info!(client_id = %client_id, "token generated successfully");

        Ok(IssuedToken {
            token,
            ttl_seconds: self.ttl_seconds,
        })
    }

    /// Every failure path yields `false`.
    pub async fn validate_token(&self, token: &str) -> bool {
        let valid = self.check_token(token).await;
        get_metrics()
            .await
            .token_validations
            .with_label_values(&[if valid { "valid" } else { "invalid" }])
            .inc();
        valid
    }

    async fn check_token(&self, token: &str) -> bool {
        let signed = match self.codec.decode(token) {
            Ok(signed) => signed,
            Err(e) => {
                debug!("token decode failed: {}", e);
                return false;
            }
        };

        let Some(stored) = self.store.lookup(token).await else {
            warn!("token not found in store");
            return false;
        };

        if stored.is_expired_at(now_ms()) {
            self.store.delete(token).await;
            get_metrics().await.active_tokens.set(self.store.count().await as i64);
            warn!(client_id = %stored.client_id, "token expired");
            return false;
        }

        let valid = self.codec.verify(&stored, &signed.signature);
        if !valid {
            warn!(client_id = %signed.payload.client_id, "invalid token hash");
        }
        valid
    }

    pub async fn active_token_count(&self) -> usize {
        self.store.count().await
    }

    pub async fn sweep_expired(&self) -> usize {
        let swept = self.store.sweep(now_ms()).await;

        let metrics = get_metrics().await;
        metrics.tokens_swept.inc_by(swept as u64);
        metrics.active_tokens.set(self.store.count().await as i64);
        if swept > 0 {
            info!("cleaned up {} expired tokens", swept);
        }
        swept
    }
}
