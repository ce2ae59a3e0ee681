//! Configuration file handling for morphwave.
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/morphwave` on Linux). Every field has a default, so a partial
//! or missing file is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use morphwave_core::{AnimationSpeed, ColorTheme};
use morphwave_field::{
    DEFAULT_SCALE, DEFAULT_TABLE_SIZE, DEFAULT_TARGET_FPS, MAX_SCALE, MIN_SCALE, WaveSettings,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Highest frame rate accepted from the config.
pub const MAX_FPS: u32 = 240;

/// Default rate at which the terminal host offers ticks.
pub const DEFAULT_REFRESH_HZ: u32 = 120;

/// Errors raised while reading or writing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gradient theme.
    pub theme: ColorTheme,
    /// Animation speed preset.
    pub speed: AnimationSpeed,
    /// Fraction of the terminal's pixel resolution the field is computed at.
    pub scale: f32,
    /// Frames per second the renderer paces to.
    pub target_fps: u32,
    /// How often the terminal host offers a tick.
    pub refresh_hz: u32,
    /// Show the info overlay on startup.
    pub show_overlay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ColorTheme::default(),
            speed: AnimationSpeed::default(),
            scale: DEFAULT_SCALE,
            target_fps: DEFAULT_TARGET_FPS,
            refresh_hz: DEFAULT_REFRESH_HZ,
            show_overlay: true,
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "morphwave").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config.normalized())
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, contents).map_err(write_err)?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Clamp numeric settings into their supported ranges.
    pub fn normalized(mut self) -> Self {
        self.scale = if self.scale.is_finite() {
            self.scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            DEFAULT_SCALE
        };
        self.target_fps = self.target_fps.clamp(1, MAX_FPS);
        self.refresh_hz = self.refresh_hz.clamp(1, MAX_FPS);
        self
    }

    /// Renderer settings derived from this config.
    pub fn wave_settings(&self) -> WaveSettings {
        WaveSettings {
            theme: self.theme,
            speed: self.speed,
            scale: self.scale,
            target_fps: self.target_fps,
            table_size: DEFAULT_TABLE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("theme = \"cosmic\"\n").unwrap();
        assert_eq!(config.theme, ColorTheme::Cosmic);
        assert_eq!(config.speed, AnimationSpeed::Normal);
        assert_eq!(config.scale, DEFAULT_SCALE);
        assert_eq!(config.target_fps, 60);
        assert!(config.show_overlay);
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        assert!(toml::from_str::<Config>("theme = \"lava\"\n").is_err());
    }

    #[test]
    fn test_normalized_clamps() {
        let config = Config {
            scale: 7.0,
            target_fps: 0,
            refresh_hz: 10_000,
            ..Config::default()
        }
        .normalized();
        assert_eq!(config.scale, MAX_SCALE);
        assert_eq!(config.target_fps, 1);
        assert_eq!(config.refresh_hz, MAX_FPS);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            theme: ColorTheme::Forest,
            speed: AnimationSpeed::Slow,
            show_overlay: false,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "scale = \"big\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_wave_settings_follow_config() {
        let config = Config {
            theme: ColorTheme::Sunset,
            target_fps: 30,
            ..Config::default()
        };
        let settings = config.wave_settings();
        assert_eq!(settings.theme, ColorTheme::Sunset);
        assert_eq!(settings.target_fps, 30);
        assert_eq!(settings.table_size, DEFAULT_TABLE_SIZE);
    }
}
