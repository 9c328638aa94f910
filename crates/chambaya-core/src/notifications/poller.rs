//! Background unread-count polling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::NotificationBadge;
use crate::api::ApiResult;

/// Anything that can report the current unread count.
#[async_trait]
pub trait UnreadSource: Send + Sync {
    async fn unread_count(&self) -> ApiResult<usize>;
}

/// Polls an [`UnreadSource`] on a fixed interval and publishes badges.
///
/// The first poll happens immediately. A failed poll keeps the last
/// badge and waits for the next tick.
#[derive(Debug)]
pub struct UnreadPoller {
    badge: watch::Receiver<NotificationBadge>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl UnreadPoller {
    pub fn spawn<S>(source: Arc<S>, interval: Duration) -> Self
    where
        S: UnreadSource + 'static,
    {
        let (tx, badge) = watch::channel(NotificationBadge::default());
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(source, interval, tx, cancel.clone()));
        Self {
            badge,
            cancel,
            handle,
        }
    }

    /// Latest published badge.
    pub fn badge(&self) -> NotificationBadge {
        *self.badge.borrow()
    }

    /// Receiver notified whenever a poll publishes a new badge.
    pub fn subscribe(&self) -> watch::Receiver<NotificationBadge> {
        self.badge.clone()
    }

    /// Stops polling and waits for the task to finish.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "notification poller ended abnormally");
        }
    }
}

async fn poll_loop<S: UnreadSource>(
    source: Arc<S>,
    interval: Duration,
    tx: watch::Sender<NotificationBadge>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = source.unread_count() => result,
        };

        match result {
            Ok(count) => {
                tracing::debug!(count, "unread notifications polled");
                tx.send_replace(NotificationBadge::new(count));
            }
            Err(e) => {
                tracing::warn!(kind = %e.kind, error = %e, "unread poll failed, keeping last badge");
            }
        }
    }

    tracing::debug!("notification poller stopped");
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::api::{ApiError, ApiErrorKind};

    /// Replays scripted results; repeats the last one when exhausted.
    struct ScriptedSource {
        script: Mutex<VecDeque<ApiResult<usize>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<ApiResult<usize>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl UnreadSource for ScriptedSource {
        async fn unread_count(&self) -> ApiResult<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        }
    }

    fn network_error() -> ApiError {
        ApiError::new(ApiErrorKind::Network, "offline")
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_badge_on_first_tick() {
        let source = ScriptedSource::new(vec![Ok(150)]);
        let poller = UnreadPoller::spawn(Arc::clone(&source), Duration::from_secs(60));
        let mut rx = poller.subscribe();

        rx.changed().await.unwrap();
        let badge = *rx.borrow();
        assert_eq!(badge.count, 150);
        assert_eq!(badge.label().as_deref(), Some("99+"));

        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_poll_keeps_last_badge() {
        let source = ScriptedSource::new(vec![Ok(4), Err(network_error())]);
        let poller = UnreadPoller::spawn(Arc::clone(&source), Duration::from_secs(60));
        let mut rx = poller.subscribe();
        rx.changed().await.unwrap();
        assert_eq!(poller.badge().count, 4);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(source.calls.load(Ordering::SeqCst) >= 2);
        assert_eq!(poller.badge().count, 4);

        poller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_polling() {
        let source = ScriptedSource::new(vec![Ok(1)]);
        let poller = UnreadPoller::spawn(Arc::clone(&source), Duration::from_secs(60));
        let mut rx = poller.subscribe();
        rx.changed().await.unwrap();

        poller.stop().await;
        let calls = source.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), calls);
    }
}
