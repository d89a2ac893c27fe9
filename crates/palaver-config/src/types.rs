//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [session]                # conversation cache TTL and sweep period
//! [chat]                   # chat service behaviour
//! [logging]                # log level and file output
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Maps to the full TOML config file. All sections are optional so that
/// partial configs (e.g., project-local overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalaverConfig {
    /// Session cache configuration.
    pub session: Option<SessionConfig>,

    /// Chat service configuration.
    pub chat: Option<ChatConfig>,

    /// Logging configuration.
    pub logging: Option<LoggingConfig>,
}

impl PalaverConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Sections replace whole; a layer that sets `[session]` overrides every
    /// session field.
    pub fn merge(&mut self, other: PalaverConfig) {
        if other.session.is_some() {
            self.session = other.session;
        }

        if other.chat.is_some() {
            self.chat = other.chat;
        }

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// Effective session settings (defaults when the section is absent).
    pub fn session(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    /// Effective chat settings.
    pub fn chat(&self) -> ChatConfig {
        self.chat.clone().unwrap_or_default()
    }

    /// Effective logging settings.
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    /// Reject values the runtime cannot use.
    pub fn validate(&self) -> crate::Result<()> {
        let session = self.session();
        if session.ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session.ttl_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if session.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session.sweep_interval_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.chat().room_name_words == 0 {
            return Err(ConfigError::Invalid {
                field: "chat.room_name_words".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Session cache configuration.
///
/// Controls how long idle conversations stay in memory and how often the
/// reclaimer looks for them.
///
/// ```toml
/// [session]
/// ttl_secs = 1800
/// sweep_interval_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle seconds before a cached conversation is evicted.
    pub ttl_secs: u64,
    /// Seconds between reclaimer sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

impl SessionConfig {
    /// Idle TTL as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep period as a duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Chat service configuration.
///
/// ```toml
/// [chat]
/// model = "echo"
/// room_name_words = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model client to use.
    pub model: String,
    /// Number of prompt words used to name a new chat room.
    pub room_name_words: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "echo".to_string(),
            room_name_words: 10,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Logging configuration section.
///
/// ```toml
/// [logging]
/// level = "info"
/// json_file = true
/// directory = "/var/log/palaver"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console filter level for palaver crates.
    pub level: String,
    /// Whether to also write JSON logs to a daily rolling file.
    pub json_file: bool,
    /// Directory for log files (defaults to `<config dir>/logs`).
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_file: true,
            directory: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = PalaverConfig::from_toml("").unwrap();
        assert!(config.session.is_none());
        assert!(config.chat.is_none());
        assert!(config.logging.is_none());
        assert_eq!(config.session(), SessionConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = PalaverConfig::from_toml(
            r#"
[session]
ttl_secs = 120
sweep_interval_secs = 15

[chat]
model = "echo"
room_name_words = 5

[logging]
level = "debug"
json_file = false
"#,
        )
        .unwrap();

        let session = config.session();
        assert_eq!(session.ttl(), Duration::from_secs(120));
        assert_eq!(session.sweep_interval(), Duration::from_secs(15));
        assert_eq!(config.chat().room_name_words, 5);

        let logging = config.logging();
        assert_eq!(logging.level, "debug");
        assert!(!logging.json_file);
        assert!(logging.directory.is_none());
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let config = PalaverConfig::from_toml(
            r#"
[session]
ttl_secs = 300
"#,
        )
        .unwrap();

        let session = config.session();
        assert_eq!(session.ttl_secs, 300);
        assert_eq!(session.sweep_interval_secs, 60);
    }

    #[test]
    fn test_merge_overrides_sections() {
        let mut base = PalaverConfig::from_toml(
            r#"
[session]
ttl_secs = 100

[chat]
room_name_words = 3
"#,
        )
        .unwrap();

        let overlay = PalaverConfig::from_toml(
            r#"
[session]
ttl_secs = 900
"#,
        )
        .unwrap();

        base.merge(overlay);
        assert_eq!(base.session().ttl_secs, 900);
        // Untouched sections survive
        assert_eq!(base.chat().room_name_words, 3);
    }

    #[test]
    fn test_roundtrip_toml() {
        let config = PalaverConfig {
            session: Some(SessionConfig {
                ttl_secs: 42,
                sweep_interval_secs: 7,
            }),
            chat: Some(ChatConfig::default()),
            logging: None,
        };

        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[session]"));
        assert_eq!(PalaverConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let config = PalaverConfig::from_toml("[session]\nttl_secs = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("session.ttl_secs"));

        let config = PalaverConfig::from_toml("[session]\nsweep_interval_secs = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));

        assert!(PalaverConfig::new().validate().is_ok());
    }

    #[test]
    fn test_unknown_sections_ignored() {
        // Unknown sections are ignored so older binaries accept newer files
        let config = PalaverConfig::from_toml("[future]\nflag = true\n").unwrap();
        assert_eq!(config, PalaverConfig::default());
    }
}
