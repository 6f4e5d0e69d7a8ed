//! Configuration management for the relay console

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the relay server URL
pub const SERVER_ENV: &str = "RELAY_CONSOLE_SERVER";

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Relay server connection
    #[serde(default)]
    pub server: ServerSettings,

    /// Local player binaries
    #[serde(default)]
    pub player: PlayerSettings,

    /// Path to settings file (not serialized)
    #[serde(skip)]
    settings_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the relay server
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// mpv binary used for delayed playback
    #[serde(default = "default_mpv_path")]
    pub mpv_path: String,

    /// ffplay binary used when mpv is unavailable
    #[serde(default = "default_ffplay_path")]
    pub ffplay_path: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_mpv_path() -> String {
    "mpv".to_string()
}

fn default_ffplay_path() -> String {
    "ffplay".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            mpv_path: default_mpv_path(),
            ffplay_path: default_ffplay_path(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            player: PlayerSettings::default(),
            settings_path: None,
        }
    }
}

impl Settings {
    /// Load settings from the default location or create defaults
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_settings_path()?)
    }

    /// Load settings from a specific file, writing defaults when the
    /// file does not exist yet
    pub fn load_from(settings_path: PathBuf) -> Result<Self> {
        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read settings file: {:?}", settings_path))?;

            let mut settings: Settings = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse settings file: {:?}", settings_path))?;

            settings.settings_path = Some(settings_path);
            Ok(settings)
        } else {
            let mut settings = Settings::default();
            settings.settings_path = Some(settings_path);
            settings.save()?;
            Ok(settings)
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let settings_path = match self.settings_path.clone() {
            Some(path) => path,
            None => Self::default_settings_path()?,
        };

        // Ensure parent directory exists
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        std::fs::write(&settings_path, contents)
            .with_context(|| format!("Failed to write settings file: {:?}", settings_path))?;

        Ok(())
    }

    /// Apply environment overrides on top of the loaded file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(SERVER_ENV) {
            if !url.is_empty() {
                self.server.base_url = url;
            }
        }
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> Result<PathBuf> {
        match self.settings_path.clone() {
            Some(path) => Ok(path),
            None => Self::default_settings_path(),
        }
    }

    /// Get default settings path
    fn default_settings_path() -> Result<PathBuf> {
        let proj_dirs = directories::ProjectDirs::from("dev", "streamweb", "relay-console")
            .context("Failed to determine settings directory")?;

        Ok(proj_dirs.config_dir().join("settings.toml"))
    }
}
