//! Configuration loading
//!
//! Configuration is read from `$XDG_CONFIG_HOME/habit-streaks/config.toml`
//! (`~/.config/habit-streaks/config.toml`). Every field is optional; a missing
//! file yields the defaults. Habit data lives under `$XDG_DATA_HOME`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analytics::DEFAULT_WINDOW_DAYS;
use crate::error::{Result, TrackerError};

const APP_DIR: &str = "habit-streaks";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: PathBuf) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path,
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Habit data file; defaults to `$XDG_DATA_HOME/habit-streaks/habits.json`
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    /// Trailing window used for the struggling-habit ranking
    #[serde(default = "default_window_days")]
    pub struggling_window_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            struggling_window_days: default_window_days(),
        }
    }
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Default config file location
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Default data file location
    pub fn default_data_file() -> PathBuf {
        xdg_data_home().join(APP_DIR).join("habits.json")
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from a specific path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| TrackerError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn validate(&self) -> Result<()> {
        if self.analytics.struggling_window_days == 0 {
            return Err(TrackerError::Config(
                "analytics.struggling_window_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved data file path
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .map(expand_home)
            .unwrap_or_else(Self::default_data_file)
    }
}
