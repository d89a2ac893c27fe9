//! Configuration for the session cache.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default idle time before a session is reclaimed (30 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Default period between reclamation passes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the session cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Sessions idle for longer than this are evicted by the next sweep.
    pub ttl: Duration,

    /// Period of the background reclaimer.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from explicit durations.
    pub fn from_durations(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            ttl,
            sweep_interval,
        }
    }

    /// Set the idle TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Check that both durations are positive.
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(Error::InvalidConfig("ttl must be greater than zero".into()));
        }
        if self.sweep_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "sweep_interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, DEFAULT_TTL);
        assert_eq!(config.sweep_interval, DEFAULT_SWEEP_INTERVAL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::new()
            .with_ttl(Duration::from_millis(100))
            .with_sweep_interval(Duration::from_millis(50));
        assert_eq!(config.ttl, Duration::from_millis(100));
        assert_eq!(config.sweep_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_zero_durations_rejected() {
        let zero_ttl = CacheConfig::from_durations(Duration::ZERO, Duration::from_secs(1));
        assert!(matches!(zero_ttl.validate(), Err(Error::InvalidConfig(_))));

        let zero_sweep = CacheConfig::from_durations(Duration::from_secs(1), Duration::ZERO);
        assert!(matches!(zero_sweep.validate(), Err(Error::InvalidConfig(_))));
    }
}
