//! Playback configuration
//!
//! Defaults match the web player: 70% volume, repeat off, shuffle off,
//! 3 second restart threshold for "previous" and a 100ms position tick.

use crate::error::{PlaybackError, Result};
use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 0.7)
    pub volume: f32,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Maximum play history size (default: 50)
    pub history_size: usize,

    /// Elapsed time after which "previous" restarts the track (default: 3000)
    pub previous_restart_ms: u64,

    /// Position sampling interval (default: 100)
    pub position_interval_ms: u64,

    /// Fixed seed for shuffle selection (default: random)
    pub shuffle_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
            repeat: RepeatMode::Off,
            shuffle: false,
            history_size: 50,
            previous_restart_ms: 3000,
            position_interval_ms: 100,
            shuffle_seed: None,
        }
    }
}

impl PlaybackConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables use the `ENCORE_` prefix, e.g.
    /// `ENCORE_VOLUME=0.5` or `ENCORE_REPEAT=all`, and override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlaybackError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(PlaybackError::Config(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.volume
            )));
        }

        if self.history_size == 0 {
            return Err(PlaybackError::Config(
                "history_size must be at least 1".to_string(),
            ));
        }

        if self.position_interval_ms == 0 {
            return Err(PlaybackError::Config(
                "position_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Position sampling interval
    pub fn position_interval(&self) -> Duration {
        Duration::from_millis(self.position_interval_ms)
    }

    /// Restart threshold for "previous", in seconds
    pub fn previous_restart_secs(&self) -> f64 {
        self.previous_restart_ms as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert!((config.volume - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert!(!config.shuffle);
        assert_eq!(config.history_size, 50);
        assert_eq!(config.previous_restart_secs(), 3.0);
        assert_eq!(config.position_interval(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "volume = 0.4\nrepeat = \"all\"\nshuffle = true\nposition_interval_ms = 250"
        )
        .unwrap();

        let config = PlaybackConfig::load(Some(file.path())).unwrap();
        assert!((config.volume - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.repeat, RepeatMode::All);
        assert!(config.shuffle);
        assert_eq!(config.position_interval_ms, 250);
        // Untouched keys keep their defaults
        assert_eq!(config.history_size, 50);
    }

    #[test]
    fn environment_overrides_defaults() {
        std::env::set_var("ENCORE_PREVIOUS_RESTART_MS", "5000");
        let config = PlaybackConfig::load(None).unwrap();
        std::env::remove_var("ENCORE_PREVIOUS_RESTART_MS");

        assert_eq!(config.previous_restart_ms, 5000);
        assert_eq!(config.previous_restart_secs(), 5.0);
    }

    #[test]
    fn load_missing_file_fails() {
        let result = PlaybackConfig::load(Some(Path::new("/nonexistent/encore.toml")));
        assert!(matches!(result, Err(PlaybackError::Config(_))));
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let config = PlaybackConfig {
            volume: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_interval() {
        let config = PlaybackConfig {
            position_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
