// What the UI asks to hear
use serde::{Deserialize, Serialize};

/// A playback request from the catalog: the display text plus an optional
/// explicit clip name. The key (clip name when present, otherwise the text)
/// identifies the session and is what the speech fallback utters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    pub text: String,
    pub audio_file_name: Option<String>,
}

impl PlaybackRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio_file_name: None,
        }
    }

    pub fn with_clip(text: impl Into<String>, audio_file_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio_file_name: Some(audio_file_name.into()),
        }
    }

    /// Resolution and session key
    pub fn key(&self) -> &str {
        match self.audio_file_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.text,
        }
    }
}

impl From<&str> for PlaybackRequest {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for PlaybackRequest {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
