use serde::{Deserialize, Serialize};

/// Claims embedded in every issued token.
///
/// Field order is the canonical serialization order; the signature is
/// computed over exactly these bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "timestamp")]
    pub issued_at_ms: i64,
    #[serde(rename = "expiryTimestamp")]
    pub expires_at_ms: i64,
}

impl TokenPayload {
    pub fn new(client_id: String, issued_at_ms: i64, ttl_seconds: u64) -> Self {
        let ttl_ms = i64::try_from(ttl_seconds).unwrap_or(i64::MAX).saturating_mul(1000);
        let expires_at_ms = issued_at_ms.saturating_add(ttl_ms);
        Self {
            client_id,
            issued_at_ms,
            expires_at_ms,
        }
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at_ms < now_ms
    }
}

/// Payload plus its hex-encoded HMAC-SHA256 signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedToken {
    pub payload: TokenPayload,
    #[serde(rename = "hash")]
    pub signature: String,
}

/// Result of a successful issuance.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub ttl_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_ttl_after_issue() {
        let payload = TokenPayload::new("c".to_string(), 1_700_000_000_000, 3600);
        assert_eq!(payload.expires_at_ms, 1_700_003_600_000);
        assert!(!payload.is_expired_at(1_700_003_600_000));
        assert!(payload.is_expired_at(1_700_003_600_001));
    }

    #[test]
    fn huge_ttl_saturates_instead_of_wrapping() {
        let payload = TokenPayload::new("c".to_string(), 1_700_000_000_000, u64::MAX);
        assert_eq!(payload.expires_at_ms, i64::MAX);
        assert!(!payload.is_expired_at(1_700_000_000_000));
    }
}
