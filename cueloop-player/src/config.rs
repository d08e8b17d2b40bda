//! cueloop-player runtime configuration

use cueloop_common::config::{PlayerSettings, TomlConfig};
use std::time::Duration;

/// Player configuration resolved from the TOML file and built-in defaults
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Region padding around each cue (seconds)
    pub padding_sec: f64,

    /// How long a notification stays visible
    pub toast_duration: Duration,

    /// Headless playhead polling interval
    pub tick_interval: Duration,

    /// Event bus capacity
    pub event_capacity: usize,
}

impl From<&PlayerSettings> for PlayerConfig {
    fn from(settings: &PlayerSettings) -> Self {
        Self {
            padding_sec: settings.padding_sec,
            toast_duration: Duration::from_millis(settings.toast_duration_ms),
            tick_interval: Duration::from_millis(settings.tick_interval_ms),
            event_capacity: settings.event_capacity,
        }
    }
}

impl From<&TomlConfig> for PlayerConfig {
    fn from(config: &TomlConfig) -> Self {
        Self::from(&config.player)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::from(&PlayerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_toml_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.padding_sec, 0.1);
        assert_eq!(config.toast_duration, Duration::from_millis(1500));
        assert_eq!(config.tick_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_from_toml() {
        let toml = TomlConfig::from_toml_str("[player]\ntoast_duration_ms = 250\n").unwrap();
        let config = PlayerConfig::from(&toml);
        assert_eq!(config.toast_duration, Duration::from_millis(250));
        assert_eq!(config.padding_sec, 0.1);
    }
}
