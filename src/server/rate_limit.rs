use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::settings::RateLimitConfig;
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

/// Fixed-window request budget per client key.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<RwLock<HashMap<String, Window>>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            window: Duration::from_millis(config.window_ms),
            max_requests: config.max_requests,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Window length in whole seconds, rounded up.
    pub fn window_secs(&self) -> u64 {
        self.window.as_millis().div_ceil(1000) as u64
    }

    pub async fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let entry = windows.entry(key.to_owned()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            let reset_in = self.window.saturating_sub(now.duration_since(entry.started));
            return Decision::Limited {
                retry_after_secs: reset_in.as_secs_f64().ceil() as u64,
            };
        }

        entry.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    /// Drops windows that have fully elapsed. Returns how many were removed.
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) < self.window);
        let removed = before - windows.len();
        if removed > 0 {
            info!("cleaned up rate limit windows. Removed: {}, Remaining: {}", removed, windows.len());
        }
        removed
    }
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let limiter = &state.rate_limiter;
    let key = client_key(&req);
    let window_secs = limiter.window_secs();

    match limiter.check(&key).await {
        Decision::Allowed { remaining } => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert("ratelimit-limit", HeaderValue::from(limiter.max_requests()));
            headers.insert("ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after_secs } => {
            warn!(ip = %key, path = %req.uri().path(), "rate limit exceeded");
            get_metrics().await.rate_limited.inc();
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Too many requests from this IP, please try again later.",
                    "details": format!(
                        "Maximum {} requests per {} seconds",
                        limiter.max_requests(),
                        window_secs
                    ),
                    "retryAfter": window_secs,
                })),
            )
                .into_response();
            response
                .headers_mut()
                .insert("retry-after", HeaderValue::from(retry_after_secs));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_ms: u64, max_requests: u32) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window_ms,
            max_requests,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn budget_is_per_key_and_resets_with_window() {
        let limiter = limiter(1000, 2);

        assert_eq!(limiter.check("a").await, Decision::Allowed { remaining: 1 });
        assert_eq!(limiter.check("a").await, Decision::Allowed { remaining: 0 });
        assert_eq!(limiter.check("a").await, Decision::Limited { retry_after_secs: 1 });
        assert_eq!(limiter.check("b").await, Decision::Allowed { remaining: 1 });

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(limiter.check("a").await, Decision::Allowed { remaining: 1 });
    }

    #[test]
    fn window_secs_rounds_up() {
        assert_eq!(limiter(1500, 1).window_secs(), 2);
        assert_eq!(limiter(900_000, 1).window_secs(), 900);
        assert_eq!(limiter(1, 1).window_secs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_drops_elapsed_windows() {
        let limiter = limiter(1000, 5);
        limiter.check("a").await;
        tokio::time::advance(Duration::from_millis(600)).await;
        limiter.check("b").await;
        tokio::time::advance(Duration::from_millis(500)).await;

        assert_eq!(limiter.cleanup().await, 1);
        assert_eq!(limiter.cleanup().await, 0);
    }
}
