//! Error types for session cache operations.

/// Error type for session cache operations.
///
/// Factory failures are not represented here: `get_or_create` returns the
/// factory's own error type unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The session identifier was empty or blank.
    #[error("Invalid session id: {0:?}")]
    InvalidKey(String),

    /// A reclaimer task is already running for this cache.
    #[error("Session reclaimer is already running")]
    ReclaimerRunning,

    /// The reclaimer was started outside a Tokio runtime.
    #[error("No Tokio runtime available to run the session reclaimer")]
    NoRuntime,

    /// TTL or sweep interval was not a positive duration.
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for session cache operations.
pub type Result<T> = std::result::Result<T, Error>;
