use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::codec::add_base64_padding;
use crate::auth::token::TokenPayload;

/// Issued tokens keyed by the exact string handed to the client.
///
/// Entries are only ever inserted or removed, never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<HashMap<String, TokenPayload>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, token: String, payload: TokenPayload) {
        self.inner.write().await.insert(token, payload);
    }

    /// Looks the token up as given, then in its re-padded form.
    pub async fn lookup(&self, token: &str) -> Option<TokenPayload> {
        let map = self.inner.read().await;
        map.get(token)
            .or_else(|| map.get(&add_base64_padding(token)))
            .cloned()
    }

    /// Removes both the given and the re-padded form. Absent keys are a no-op.
    pub async fn delete(&self, token: &str) {
        let padded = add_base64_padding(token);
        let mut map = self.inner.write().await;
        map.remove(token);
        map.remove(&padded);
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Removes every entry with `expires_at_ms < now_ms`, returns how many went.
    ///
    /// Candidates are collected under the read lock and removed under a
    /// separate write lock, so lookups are not blocked while scanning.
    pub async fn sweep(&self, now_ms: i64) -> usize {
        let expired: Vec<String> = {
            let map = self.inner.read().await;
            map.iter()
                .filter(|(_, payload)| payload.is_expired_at(now_ms))
                .map(|(token, _)| token.clone())
                .collect()
        };

        if expired.is_empty() {
            return 0;
        }

        let mut map = self.inner.write().await;
        expired
            .iter()
            .filter(|token| map.remove(token.as_str()).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(expires_at_ms: i64) -> TokenPayload {
        TokenPayload {
            client_id: "client".to_string(),
            issued_at_ms: 0,
            expires_at_ms,
        }
    }

    #[tokio::test]
    async fn insert_lookup_delete() {
        let store = TokenStore::new();
        store.insert("abc=".to_string(), payload(10)).await;

        assert_eq!(store.lookup("abc=").await, Some(payload(10)));
        assert_eq!(store.count().await, 1);

        store.delete("abc=").await;
        assert!(store.lookup("abc=").await.is_none());
        // idempotent
        store.delete("abc=").await;
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn lookup_finds_padded_entry_from_unpadded_key() {
        let store = TokenStore::new();
        store.insert("abcdef==".to_string(), payload(10)).await;

        assert!(store.lookup("abcdef").await.is_some());
        store.delete("abcdef").await;
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn insert_overwrites_silently() {
        let store = TokenStore::new();
        store.insert("k".to_string(), payload(1)).await;
        store.insert("k".to_string(), payload(2)).await;

        assert_eq!(store.count().await, 1);
        assert_eq!(store.lookup("k").await.unwrap().expires_at_ms, 2);
    }

    #[tokio::test]
    async fn sweep_removes_only_expired() {
        let store = TokenStore::new();
        store.insert("old".to_string(), payload(99)).await;
        store.insert("edge".to_string(), payload(100)).await;
        store.insert("new".to_string(), payload(500)).await;

        assert_eq!(store.sweep(100).await, 1);
        assert!(store.lookup("old").await.is_none());
        assert!(store.lookup("edge").await.is_some());
        assert_eq!(store.count().await, 2);
        assert_eq!(store.sweep(100).await, 0);
    }
}
