//! Conversation session cache with idle-TTL reclamation.
//!
//! This crate provides the in-memory registry that lets many concurrent
//! requests share one live conversation object per session:
//! - `get_or_create` with at most one committed factory run per session id
//! - Recency refresh on every hit
//! - A stoppable background reclaimer that evicts sessions idle past a TTL
//! - A synchronous `sweep` hook for deterministic tests
//!
//! # Example
//!
//! ```rust,ignore
//! use palaver_session::{CacheConfig, SessionCache};
//!
//! let config = CacheConfig::new()
//!     .with_ttl(Duration::from_secs(1800))
//!     .with_sweep_interval(Duration::from_secs(60));
//!
//! let cache = SessionCache::new(config)?;
//! let reclaimer = cache.start_reclaimer()?;
//!
//! let convo = cache
//!     .get_or_create("room-42", || async { Ok::<_, MyError>(Conversation::new()) })
//!     .await?;
//!
//! reclaimer.stop().await;
//! ```

mod cache;
mod config;
mod entry;
mod error;
mod reclaimer;

pub use cache::{CacheStats, SessionCache};
pub use config::{CacheConfig, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
pub use entry::CacheEntry;
pub use error::{Error, Result};
pub use reclaimer::ReclaimerHandle;
