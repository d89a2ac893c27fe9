//! Session cache with get-or-create semantics and TTL reclamation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::config::CacheConfig;
use crate::entry::CacheEntry;
use crate::error::{Error, Result};
use crate::reclaimer::{self, ReclaimerHandle};

/// Per-session creation gate. Misses on the same id queue here so that
/// only one factory run can commit.
type Gate = Arc<tokio::sync::Mutex<()>>;

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    created: AtomicU64,
    factory_failures: AtomicU64,
    evicted: AtomicU64,
    sweeps: AtomicU64,
}

/// State shared between cache handles and the reclaimer task.
pub(crate) struct CacheInner<V> {
    entries: RwLock<HashMap<String, Arc<CacheEntry<V>>>>,
    gates: Mutex<HashMap<String, Gate>>,
    config: CacheConfig,
    reclaimer_active: AtomicBool,
    counters: Counters,
}

impl<V> CacheInner<V> {
    /// Look up a live entry and refresh its recency.
    ///
    /// The touch happens under the shared lock, so a sweep (which needs the
    /// exclusive lock) always observes the refreshed timestamp.
    fn lookup(&self, session_id: &str) -> Option<Arc<V>> {
        let entries = self.entries.read();
        let entry = entries.get(session_id)?;
        entry.touch(Instant::now());
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        trace!(session_id = %session_id, "Session found in cache");
        Some(Arc::clone(entry.payload()))
    }

    fn install(&self, session_id: &str, payload: Arc<V>) -> Arc<V> {
        let mut entries = self.entries.write();
        let entry = Arc::clone(
            entries
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(CacheEntry::new(payload, Instant::now()))),
        );
        self.counters.created.fetch_add(1, Ordering::Relaxed);
        debug!(
            session_id = %session_id,
            cache_size = entries.len(),
            "Session created and cached"
        );
        Arc::clone(entry.payload())
    }

    fn gate(&self, session_id: &str) -> Gate {
        let mut gates = self.gates.lock();
        Arc::clone(gates.entry(session_id.to_string()).or_default())
    }

    /// Drop the gate for `session_id` once no caller holds or waits on it.
    fn release_gate(&self, session_id: &str, gate: &Gate) {
        let mut gates = self.gates.lock();
        // Clones are only taken under this lock, so a count of two (map +
        // caller) means nobody else can still be queued on it.
        if Arc::strong_count(gate) == 2
            && gates
                .get(session_id)
                .is_some_and(|current| Arc::ptr_eq(current, gate))
        {
            gates.remove(session_id);
        }
    }

    /// Remove every entry idle for longer than the TTL.
    pub(crate) fn sweep(&self) -> usize {
        let ttl = self.config.ttl;
        let mut entries = self.entries.write();
        let now = Instant::now();
        let before = entries.len();

        entries.retain(|session_id, entry| {
            if entry.is_expired(now, ttl) {
                debug!(
                    session_id = %session_id,
                    idle_ms = entry.idle_for(now).as_millis() as u64,
                    "Session expired, evicting"
                );
                false
            } else {
                true
            }
        });

        let evicted = before - entries.len();
        let remaining = entries.len();
        drop(entries);

        self.counters.sweeps.fetch_add(1, Ordering::Relaxed);
        self.counters
            .evicted
            .fetch_add(evicted as u64, Ordering::Relaxed);

        if evicted > 0 {
            debug!(evicted, remaining, "Swept expired sessions");
        }

        evicted
    }

    pub(crate) fn reclaimer_stopped(&self) {
        self.reclaimer_active.store(false, Ordering::Release);
    }
}

/// Holds a creation gate and releases it on drop, including when the
/// `get_or_create` future is cancelled mid-flight.
struct GateTicket<'a, V> {
    inner: &'a CacheInner<V>,
    session_id: &'a str,
    gate: Gate,
}

impl<V> Drop for GateTicket<'_, V> {
    fn drop(&mut self) {
        self.inner.release_gate(self.session_id, &self.gate);
    }
}

/// In-memory registry of live conversation sessions.
///
/// This cache provides:
/// - Get-or-create with at most one committed factory run per session id
/// - Recency refresh on every hit, without blocking other readers
/// - TTL eviction through [`sweep`](Self::sweep) or a background reclaimer
///
/// Payloads are handed out as `Arc<V>`; every caller for a session id gets
/// the same object. Serializing concurrent use of that object is up to the
/// caller.
pub struct SessionCache<V> {
    inner: Arc<CacheInner<V>>,
}

impl<V> SessionCache<V>
where
    V: Send + Sync + 'static,
{
    /// Create an empty cache. No reclaimer runs until
    /// [`start_reclaimer`](Self::start_reclaimer) is called.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let inner = CacheInner {
            entries: RwLock::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            config,
            reclaimer_active: AtomicBool::new(false),
            counters: Counters::default(),
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Get the current number of cached sessions.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Get the payload for `session_id`, building it with `factory` on a miss.
    ///
    /// On a hit the entry's last access is refreshed and the factory is not
    /// called. On a miss the factory runs without any map lock held; other
    /// callers missing on the same id wait for it and then receive the
    /// installed payload. A factory error is returned unchanged and leaves
    /// nothing behind in the cache.
    ///
    /// Blank ids are rejected with [`Error::InvalidKey`] before the factory
    /// could run.
    pub async fn get_or_create<F, Fut, E>(
        &self,
        session_id: &str,
        factory: F,
    ) -> std::result::Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: From<Error>,
    {
        validate_key(session_id)?;

        if let Some(payload) = self.inner.lookup(session_id) {
            return Ok(payload);
        }

        let ticket = GateTicket {
            inner: &self.inner,
            session_id,
            gate: self.inner.gate(session_id),
        };
        let _creating = ticket.gate.lock().await;

        // Another caller may have installed it while we queued.
        if let Some(payload) = self.inner.lookup(session_id) {
            return Ok(payload);
        }

        debug!(session_id = %session_id, "Session cache miss, running factory");
        match factory().await {
            Ok(value) => Ok(self.inner.install(session_id, Arc::new(value))),
            Err(e) => {
                self.inner
                    .counters
                    .factory_failures
                    .fetch_add(1, Ordering::Relaxed);
                warn!(session_id = %session_id, "Session factory failed, nothing cached");
                Err(e)
            }
        }
    }

    /// Check if a session is cached. Does not refresh recency.
    pub fn contains(&self, session_id: &str) -> bool {
        self.inner.entries.read().contains_key(session_id)
    }

    /// Peek at a cached payload without refreshing recency.
    pub fn peek(&self, session_id: &str) -> Option<Arc<V>> {
        self.inner
            .entries
            .read()
            .get(session_id)
            .map(|entry| Arc::clone(entry.payload()))
    }

    /// Last access time of a cached session.
    pub fn last_access(&self, session_id: &str) -> Option<Instant> {
        self.inner
            .entries
            .read()
            .get(session_id)
            .map(|entry| entry.last_access())
    }

    /// Idle duration of a cached session as of now.
    pub fn idle_for(&self, session_id: &str) -> Option<Duration> {
        let now = Instant::now();
        self.inner
            .entries
            .read()
            .get(session_id)
            .map(|entry| entry.idle_for(now))
    }

    /// Remove a session from the cache, returning its payload.
    ///
    /// The next `get_or_create` for this id is a miss.
    pub fn invalidate(&self, session_id: &str) -> Option<Arc<V>> {
        let removed = self.inner.entries.write().remove(session_id);
        if removed.is_some() {
            debug!(session_id = %session_id, "Session invalidated from cache");
        }
        removed.map(|entry| Arc::clone(entry.payload()))
    }

    /// Drop every cached session. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.inner.entries.write();
        let count = entries.len();
        entries.clear();
        count
    }

    /// List the ids of all cached sessions.
    pub fn session_ids(&self) -> Vec<String> {
        self.inner.entries.read().keys().cloned().collect()
    }

    /// Run one reclamation pass now and return the number of evicted sessions.
    ///
    /// This is the same pass the background reclaimer runs on each tick.
    pub fn sweep(&self) -> usize {
        self.inner.sweep()
    }

    /// Spawn the background reclaimer on the current Tokio runtime.
    ///
    /// The reclaimer runs [`sweep`](Self::sweep) every `sweep_interval` until
    /// the returned handle is stopped or dropped, or every cache handle is
    /// dropped. Only one reclaimer may run per cache.
    pub fn start_reclaimer(&self) -> Result<ReclaimerHandle> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;

        if self
            .inner
            .reclaimer_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::ReclaimerRunning);
        }

        Ok(reclaimer::spawn(
            &runtime,
            Arc::downgrade(&self.inner),
            self.inner.config.sweep_interval,
        ))
    }

    /// Whether a background reclaimer is currently running.
    pub fn reclaimer_running(&self) -> bool {
        self.inner.reclaimer_active.load(Ordering::Acquire)
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let counters = &self.inner.counters;
        CacheStats {
            size: self.len(),
            ttl: self.inner.config.ttl,
            sweep_interval: self.inner.config.sweep_interval,
            hits: counters.hits.load(Ordering::Relaxed),
            created: counters.created.load(Ordering::Relaxed),
            factory_failures: counters.factory_failures.load(Ordering::Relaxed),
            evicted: counters.evicted.load(Ordering::Relaxed),
            sweeps: counters.sweeps.load(Ordering::Relaxed),
            reclaimer_running: self.reclaimer_running(),
        }
    }
}

impl<V> Clone for SessionCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn validate_key(session_id: &str) -> Result<()> {
    if session_id.trim().is_empty() {
        return Err(Error::InvalidKey(session_id.to_string()));
    }
    Ok(())
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of cached sessions.
    pub size: usize,

    /// Configured idle TTL.
    pub ttl: Duration,

    /// Configured reclaimer period.
    pub sweep_interval: Duration,

    /// Lookups answered from the cache.
    pub hits: u64,

    /// Sessions installed by a successful factory run.
    pub created: u64,

    /// Factory runs that returned an error.
    pub factory_failures: u64,

    /// Sessions removed by sweeps.
    pub evicted: u64,

    /// Completed sweep passes.
    pub sweeps: u64,

    /// Whether a background reclaimer is running.
    pub reclaimer_running: bool,
}
