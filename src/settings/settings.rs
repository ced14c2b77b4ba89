// Settings management and persistence
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Bundled clip store and output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Directory holding the bundled clips. Relative paths are resolved
    /// against the app directory.
    pub asset_dir: PathBuf,
    /// Accepted clip extensions, in order of preference
    pub clip_extensions: Vec<String>,
    pub volume: f32, // 0.0-1.0
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("audio"),
            clip_extensions: vec!["mp3".to_string()],
            volume: 1.0,
        }
    }
}

/// Speech synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub language: String, // BCP 47 tag, e.g. "ja-JP"
    /// Explicit engine voice; derived from `language` when absent
    pub voice: Option<String>,
    pub words_per_minute: u32,
    /// Completion estimate per character of text
    pub seconds_per_char: f64,
    /// Overrides the platform speech command
    pub program: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: "ja-JP".to_string(),
            voice: None,
            words_per_minute: 180,
            seconds_per_char: 0.2,
            program: None,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub version: i32, // Settings schema version for future migrations
    pub audio: AudioSettings,
    pub speech: SpeechSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: 1,
            audio: AudioSettings::default(),
            speech: SpeechSettings::default(),
        }
    }
}

impl AppSettings {
    /// Get the settings file path
    pub fn settings_path(app_dir: &Path) -> PathBuf {
        app_dir.join("settings.json")
    }

    /// Load settings from file, or return defaults if file doesn't exist
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = Self::settings_path(app_dir);

        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let mut settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        settings.audio.volume = settings.audio.volume.clamp(0.0, 1.0);

        if settings.speech.seconds_per_char < 0.0 || !settings.speech.seconds_per_char.is_finite() {
            return Err(Error::Config(format!(
                "speech.seconds_per_char must be a non-negative number, got {}",
                settings.speech.seconds_per_char
            )));
        }

        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        // Ensure directory exists
        fs::create_dir_all(app_dir)?;

        let path = Self::settings_path(app_dir);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;

        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Asset directory with relative paths anchored at `app_dir`
    pub fn asset_dir(&self, app_dir: &Path) -> PathBuf {
        if self.audio.asset_dir.is_absolute() {
            self.audio.asset_dir.clone()
        } else {
            app_dir.join(&self.audio.asset_dir)
        }
    }
}
