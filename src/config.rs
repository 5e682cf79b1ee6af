//! Configuration file support.
//!
//! This module provides serialization and deserialization of application settings,
//! allowing users to keep their preferences, keybindings and class list in a JSON file.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LABEL_PRECISION, DEFAULT_MIN_BOX_SIZE};
use crate::keybindings::KeyBindings;
use crate::session::{Session, SessionSettings};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,

    /// Class names pre-filled when a session starts
    #[serde(default)]
    pub classes: Vec<String>,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Boxes must be strictly larger than this on both axes (image pixels)
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f32,

    /// Decimals written per normalized label value
    #[serde(default = "default_label_precision")]
    pub label_precision: usize,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_min_box_size() -> f32 {
    DEFAULT_MIN_BOX_SIZE
}

fn default_label_precision() -> usize {
    DEFAULT_LABEL_PRECISION
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            min_box_size: default_min_box_size(),
            label_precision: default_label_precision(),
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            keybindings: KeyBindings::default(),
            classes: Vec::new(),
        }
    }

    /// Session settings derived from the preferences.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            min_box_size: self.preferences.min_box_size.max(0.0),
            label_precision: self.preferences.label_precision,
        }
    }

    /// Take over the class list, tunables and keybindings of a running session.
    /// The log level is left as configured.
    pub fn capture_session(&mut self, session: &Session) {
        let settings = session.settings();
        self.preferences.min_box_size = settings.min_box_size;
        self.preferences.label_precision = settings.label_precision;
        self.keybindings = session.bindings().clone();
        self.classes = session.classes().names().to_vec();
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "bbox-labeler.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("bbox-labeler").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("bbox-labeler")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories if needed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn test_round_trip_json() {
        let mut config = AppConfig::new();
        config.classes = vec!["person".into(), "car".into()];
        config.preferences.min_box_size = 8.0;
        config.keybindings.cancel_drag.push(Key::Backspace);

        let json = config.to_json().unwrap();
        let parsed = AppConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config = AppConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(config.preferences.min_box_size, DEFAULT_MIN_BOX_SIZE);
        assert_eq!(config.preferences.label_precision, DEFAULT_LABEL_PRECISION);
        assert_eq!(config.preferences.log_level, LogLevel::Info);
        assert_eq!(config.keybindings, KeyBindings::default());
        assert!(config.classes.is_empty());
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = AppConfig::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                ..
            }
        ));
    }

    #[test]
    fn test_capture_session() {
        let mut bindings = KeyBindings::new();
        bindings.delete_selected = vec![Key::Delete];
        let settings = SessionSettings {
            min_box_size: 2.0,
            label_precision: 5,
        };
        let mut session = Session::new(settings, bindings.clone());
        session.set_classes_text("person\ncar");

        let mut config = AppConfig::new();
        config.preferences.log_level = LogLevel::Debug;
        config.capture_session(&session);

        assert_eq!(config.classes, vec!["person".to_string(), "car".to_string()]);
        assert_eq!(config.keybindings, bindings);
        assert_eq!(config.session_settings(), settings);
        assert_eq!(config.preferences.log_level, LogLevel::Debug);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("bbox-labeler-config-{}", std::process::id()));
        let path = dir.join("nested").join(AppConfig::default_filename());
        let mut config = AppConfig::new();
        config.classes = vec!["tree".into()];

        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_log_level_names() {
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level.to_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_session_settings_from_preferences() {
        let mut config = AppConfig::new();
        config.preferences.min_box_size = -3.0;
        config.preferences.label_precision = 6;
        let settings = config.session_settings();
        assert_eq!(settings.min_box_size, 0.0);
        assert_eq!(settings.label_precision, 6);
    }
}
