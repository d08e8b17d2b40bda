//! Configuration file resolution and loading
//!
//! The TOML file is optional. Resolution order for its location:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Platform config directory (`<config_dir>/cueloop/config.toml`), if present
//! 4. No file: built-in defaults
//!
//! A missing file never stops startup; it is logged and defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "CUELOOP_CONFIG";

/// Padding added around each cue when building its playback region (seconds)
pub const DEFAULT_PADDING_SEC: f64 = 0.1;

/// How long a transient notification stays visible (milliseconds)
pub const DEFAULT_TOAST_DURATION_MS: u64 = 1500;

/// Headless playhead polling interval (milliseconds)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// Broadcast buffer for the event bus
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Contents of `config.toml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Playback engine settings
    pub player: PlayerSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Playback engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Region padding around each cue (seconds)
    pub padding_sec: f64,

    /// Notification display time (milliseconds)
    pub toast_duration_ms: u64,

    /// Headless playhead tick (milliseconds)
    pub tick_interval_ms: u64,

    /// Event bus capacity
    pub event_capacity: usize,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            padding_sec: DEFAULT_PADDING_SEC,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse config from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let player = &self.player;
        if !player.padding_sec.is_finite() || player.padding_sec < 0.0 {
            return Err(Error::Config(format!(
                "padding_sec must be a non-negative number, got {}",
                player.padding_sec
            )));
        }
        if player.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be greater than 0".to_string()));
        }
        if player.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Locate the config file following the priority order above.
///
/// Returns `None` when no file was requested and no platform default exists.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|path| path.exists())
}

/// Platform config file location (`~/.config/cueloop/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cueloop").join("config.toml"))
}

/// Load and validate a config file
pub fn load_config(path: &Path) -> Result<TomlConfig> {
    let text = std::fs::read_to_string(path)?;
    TomlConfig::from_toml_str(&text)
}

/// Load config from `path`, falling back to defaults when there is no file.
///
/// A file that exists but fails to parse or validate is an error.
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        info!("No config file found, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!("Config file {} not found, using built-in defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let config = load_config(path)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}
