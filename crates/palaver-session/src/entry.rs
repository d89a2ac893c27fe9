//! Cached session entries and their recency clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// Entry stored in the cache.
///
/// The last-access time is kept as an atomic offset from `created_at` so
/// that hits can refresh it while holding only the shared map lock.
#[derive(Debug)]
pub struct CacheEntry<V> {
    payload: Arc<V>,
    created_at: Instant,
    last_access_nanos: AtomicU64,
}

impl<V> CacheEntry<V> {
    /// Create an entry whose last access is its creation time.
    pub(crate) fn new(payload: Arc<V>, now: Instant) -> Self {
        Self {
            payload,
            created_at: now,
            last_access_nanos: AtomicU64::new(0),
        }
    }

    /// Shared handle to the cached payload.
    pub fn payload(&self) -> &Arc<V> {
        &self.payload
    }

    /// When this entry was installed.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// When this entry was last returned by a lookup or created.
    pub fn last_access(&self) -> Instant {
        let nanos = self.last_access_nanos.load(Ordering::Acquire);
        self.created_at + Duration::from_nanos(nanos)
    }

    /// Record an access at `now`. Never moves the timestamp backwards.
    pub(crate) fn touch(&self, now: Instant) {
        let offset = now.saturating_duration_since(self.created_at).as_nanos();
        let offset = u64::try_from(offset).unwrap_or(u64::MAX);
        self.last_access_nanos.fetch_max(offset, Ordering::AcqRel);
    }

    /// How long the entry has gone without access as of `now`.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_access())
    }

    /// Whether the entry has been idle strictly longer than `ttl`.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.idle_for(now) > ttl
    }
}
