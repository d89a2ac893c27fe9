//! Finding and layering palaver config files.
//!
//! Two layers are read, the second overriding the first section by section:
//! 1. `<config dir>/config.toml`, where the config dir is `PALAVER_CONFIG_DIR`
//!    or the platform default (`~/.config/palaver` on Linux)
//! 2. `palaver.toml` in the working directory
//!
//! A broken layer never stops the process; it is skipped with a warning.

use std::path::{Path, PathBuf};

use crate::{ConfigError, PalaverConfig, Result};

/// Default config filename for project-local config.
pub const PROJECT_CONFIG_FILE: &str = "palaver.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for platform directory resolution.
const APP_NAME: &str = "palaver";

/// Environment variable to override the config directory.
///
/// When set, this takes precedence over the platform default. Useful for
/// tests and for running several instances side by side.
const CONFIG_DIR_ENV: &str = "PALAVER_CONFIG_DIR";

/// One candidate config file and whether it contributed.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Merged config plus a record of how it was assembled.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: PalaverConfig,
    /// Sources that were checked, in order of precedence (lowest first).
    pub sources: Vec<ConfigSource>,
    /// Warnings generated during loading (unreadable layers, odd settings).
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the layers that contributed.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Discover and merge the user and project layers.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Load configuration with explicit control over the user config directory.
///
/// `config_dir` overrides both `PALAVER_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut config = PalaverConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    // 1. User config: explicit override, then env var, then platform default
    let user_config_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => config_path(),
    };
    if let Some(path) = user_config_path {
        sources.push(load_layer(&mut config, &path, &mut warnings));
    }

    // 2. Project-local config
    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    sources.push(load_layer(&mut config, &project_path, &mut warnings));

    check_session_settings(&config, &mut warnings);

    Ok(LoadedConfig {
        config,
        sources,
        warnings,
    })
}

/// Parse a single config file. Errors are returned, not downgraded.
pub fn load_config_file(path: &Path) -> Result<PalaverConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    PalaverConfig::from_toml(&contents)
}

/// Save configuration to a file.
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &PalaverConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_toml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Get the user config file path.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Get the user config directory for palaver.
///
/// Checks `PALAVER_CONFIG_DIR` first, then falls back to the platform
/// default (`~/.config/palaver` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Merge one layer into `config`.
///
/// Missing files are skipped; unreadable or malformed files become warnings.
fn load_layer(config: &mut PalaverConfig, path: &Path, warnings: &mut Vec<String>) -> ConfigSource {
    if !path.is_file() {
        return ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        };
    }

    match load_config_file(path) {
        Ok(layer) => {
            config.merge(layer);
            ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            }
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            ConfigSource {
                path: path.to_path_buf(),
                loaded: false,
            }
        }
    }
}

/// Flag session settings that are legal but probably unintended.
fn check_session_settings(config: &PalaverConfig, warnings: &mut Vec<String>) {
    let Some(ref session) = config.session else {
        return;
    };

    if session.sweep_interval_secs > session.ttl_secs {
        warnings.push(format!(
            "[session] sweep_interval_secs ({}) exceeds ttl_secs ({}); \
             idle sessions may linger up to {}s past their TTL.",
            session.sweep_interval_secs, session.ttl_secs, session.sweep_interval_secs
        ));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_shape() {
        // May be None in some CI environments
        if let Some(p) = config_path() {
            assert!(p.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[session]
ttl_secs = 600
"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.session().ttl_secs, 600);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_no_files() {
        let dir = TempDir::new().unwrap();
        let empty_config_dir = TempDir::new().unwrap();
        // Explicit empty config dir so the real user config is not picked up
        let loaded =
            load_config_with_options(Some(dir.path()), Some(empty_config_dir.path())).unwrap();
        assert!(loaded.config.session.is_none());
        assert!(loaded.loaded_from().is_empty());
        assert_eq!(loaded.sources.len(), 2);
    }

    #[test]
    fn test_load_config_layered_merge() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();

        fs::write(
            user_dir.path().join("config.toml"),
            r#"
[session]
ttl_secs = 3600

[chat]
room_name_words = 4
"#,
        )
        .unwrap();

        fs::write(
            project_dir.path().join(PROJECT_CONFIG_FILE),
            r#"
[session]
ttl_secs = 120
sweep_interval_secs = 10
"#,
        )
        .unwrap();

        let loaded =
            load_config_with_options(Some(project_dir.path()), Some(user_dir.path())).unwrap();
        let config = &loaded.config;

        // Project-local overrides user config
        assert_eq!(config.session().ttl_secs, 120);
        assert_eq!(config.session().sweep_interval_secs, 10);
        // User sections the project didn't touch are kept
        assert_eq!(config.chat().room_name_words, 4);
        assert_eq!(loaded.loaded_from().len(), 2);
    }

    #[test]
    fn test_malformed_config_warns_but_continues() {
        let dir = TempDir::new().unwrap();
        let empty_config_dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "not valid toml {{{{").unwrap();

        let loaded =
            load_config_with_options(Some(dir.path()), Some(empty_config_dir.path())).unwrap();
        assert!(!loaded.warnings.is_empty());
        assert!(loaded.warnings[0].contains("Failed to load"));
        assert!(loaded.loaded_from().is_empty());
    }

    #[test]
    fn test_sweep_longer_than_ttl_warns() {
        let dir = TempDir::new().unwrap();
        let empty_config_dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            r#"
[session]
ttl_secs = 30
sweep_interval_secs = 120
"#,
        )
        .unwrap();

        let loaded =
            load_config_with_options(Some(dir.path()), Some(empty_config_dir.path())).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("sweep_interval_secs"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = PalaverConfig::new();
        config.session = Some(crate::SessionConfig {
            ttl_secs: 99,
            sweep_interval_secs: 9,
        });

        save_config(&config, &path).unwrap();
        let reloaded = load_config_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}
