//! TUI configuration persistence
//!
//! Loads the lockout tunables and input settings. Failure counters and
//! passcodes are never written here.

use std::fs;
use std::path::{Path, PathBuf};

use latchkey_core::{ConfigError, LockoutConfig};
use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "latchkey";

/// Longest passcode the entry screen will accept
pub const MAX_PASSCODE_LENGTH: usize = 12;

/// TUI configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Lockout tunables
    #[serde(default)]
    pub lockout: LockoutConfig,

    /// Digits per passcode; entry is submitted once this many are typed
    #[serde(default = "default_passcode_length")]
    pub passcode_length: usize,
}

fn default_passcode_length() -> usize {
    4
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            lockout: LockoutConfig::default(),
            passcode_length: default_passcode_length(),
        }
    }
}

impl TuiConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config).join(CONFIG_DIR_NAME);
            return Some(path);
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns default configuration if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file
    ///
    /// Missing, unreadable, malformed or invalid files all fall back to the
    /// defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let config: Self = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}", e);
                    return Self::default();
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file: {}", e);
                return Self::default();
            }
        };

        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Check tunables before use
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lockout.validate()?;
        if self.passcode_length == 0 || self.passcode_length > MAX_PASSCODE_LENGTH {
            return Err(ConfigError::PasscodeLength(MAX_PASSCODE_LENGTH));
        }
        Ok(())
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents)?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }
}
