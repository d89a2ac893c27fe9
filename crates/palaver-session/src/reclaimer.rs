//! Background task that periodically evicts idle sessions.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::CacheInner;

/// Handle to a running reclaimer.
///
/// Call [`stop`](Self::stop) for an orderly shutdown. Dropping the handle
/// also cancels the task, without waiting for it to finish.
#[derive(Debug)]
pub struct ReclaimerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ReclaimerHandle {
    /// Cancel the reclaimer and wait for its task to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Session reclaimer task ended abnormally");
        }
    }

    /// Whether the reclaimer task is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Token that cancels this reclaimer, for wiring into a shutdown signal.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for ReclaimerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Longest period the sweep loop will wait between passes. Longer configured
/// intervals are clamped so the first deadline stays representable.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Clears the cache's running flag when the sweep task ends, whether it
/// stopped, saw the cache dropped, or panicked.
struct RunningFlag<V> {
    cache: Weak<CacheInner<V>>,
}

impl<V> Drop for RunningFlag<V> {
    fn drop(&mut self) {
        if let Some(inner) = self.cache.upgrade() {
            inner.reclaimer_stopped();
        }
    }
}

/// Spawn the sweep loop. Holds only a weak reference so the task ends once
/// every cache handle is gone.
pub(crate) fn spawn<V>(
    runtime: &Handle,
    cache: Weak<CacheInner<V>>,
    interval: Duration,
) -> ReclaimerHandle
where
    V: Send + Sync + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let period = interval.min(MAX_SWEEP_PERIOD);

    let task = runtime.spawn(async move {
        let _running = RunningFlag {
            cache: cache.clone(),
        };
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_ms = period.as_millis() as u64, "Session reclaimer started");

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let Some(inner) = cache.upgrade() else {
                        debug!("Session cache dropped, reclaimer exiting");
                        return;
                    };
                    inner.sweep();
                }
            }
        }

        info!("Session reclaimer stopped");
    });

    ReclaimerHandle {
        cancel,
        task: Some(task),
    }
}
