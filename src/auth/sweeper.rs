use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::auth::service::AuthService;
use crate::server::rate_limit::RateLimiter;

/// Background task removing expired tokens on a fixed interval.
///
/// Also drops elapsed rate-limit windows when a limiter is given.
pub fn spawn_sweeper(
    auth: Arc<AuthService>,
    rate_limiter: Option<RateLimiter>,
    every: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    info!("token sweeper started, interval {:?}", every);
    spawn_periodic("token sweep", every, shutdown, move || {
        let auth = auth.clone();
        let rate_limiter = rate_limiter.clone();
        async move {
            let swept = auth.sweep_expired().await;
            debug!("sweep tick removed {} tokens", swept);
            if let Some(limiter) = rate_limiter {
                limiter.cleanup().await;
            }
        }
    })
}

/// Runs `tick` every `every` until `shutdown` flips to `true` or its sender
/// is dropped. Each tick runs in its own task, so a panicking tick is logged
/// and the loop carries on with the next one.
pub fn spawn_periodic<F, Fut>(
    name: &'static str,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
    tick: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = tokio::spawn(tick()).await {
                        error!("{} failed: {}", name, e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("{} stopped", name);
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::auth::store::TokenStore;

    #[tokio::test]
    async fn sweeper_removes_expired_tokens_and_stops() {
        let auth = Arc::new(AuthService::new("secret", 0, TokenStore::new()));
        auth.issue_token("a").await.unwrap();
        auth.issue_token("b").await.unwrap();

        let (tx, rx) = watch::channel(false);
        let handle = spawn_sweeper(auth.clone(), None, Duration::from_millis(20), rx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(auth.active_token_count().await, 0);

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn panicking_tick_does_not_stop_the_loop() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(false);

        let counter = ticks.clone();
        let handle = spawn_periodic("flaky", Duration::from_millis(10), rx, move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("first tick blows up");
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(ticks.load(Ordering::SeqCst) >= 3);

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn sweeper_stops_when_sender_dropped() {
        let auth = Arc::new(AuthService::new("secret", 3600, TokenStore::new()));
        let (tx, rx) = watch::channel(false);
        let handle = spawn_sweeper(auth, None, Duration::from_secs(60), rx);

        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
