//! Session settings with persistence
//!
//! Settings are saved to `~/.config/skitter/settings.toml`

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use skitter_core::TimeConfig;
use skitter_game::{CameraConfig, CentipedeConfig, LensConfig};
use tracing::{info, warn};

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub camera: CameraConfig,
    pub lens: LensConfig,
    pub centipede: CentipedeConfig,
    pub session: SessionSettings,
    pub time: TimeConfig,
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("skitter"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Whether a settings file exists on disk
    pub fn exists() -> bool {
        Self::settings_path().is_some_and(|p| p.exists())
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Headless session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Frames to simulate
    pub frames: u64,
    /// Seconds between frames
    pub frame_delta: f32,
    /// Centipedes in the arena
    pub players: u32,
    /// Body segments each centipede starts with
    pub starting_segments: u32,
    /// Virtual window width in pixels
    pub window_width: u32,
    /// Virtual window height in pixels
    pub window_height: u32,
    /// Log a status line every this many frames (0 = never)
    pub report_interval: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_delta: 1.0 / 60.0,
            players: 2,
            starting_segments: 4,
            window_width: 1280,
            window_height: 720,
            report_interval: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_toml() {
        let content = toml::to_string_pretty(&GameSettings::default()).unwrap();
        let settings: GameSettings = toml::from_str(&content).unwrap();
        assert_eq!(settings.session.players, 2);
        assert_eq!(settings.camera.initial.distance, 150.0);
        assert_eq!(settings.centipede.model, "models/centipede");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let settings: GameSettings = toml::from_str(
            r#"
            [session]
            players = 4
            "#,
        )
        .unwrap();
        assert_eq!(settings.session.players, 4);
        assert_eq!(settings.session.frames, 600);
        assert!(settings.camera.validate().is_ok());
    }
}
