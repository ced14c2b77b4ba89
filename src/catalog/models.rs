// Vocabulary data models
use serde::{Deserialize, Serialize};

use crate::playback::PlaybackRequest;

/// JLPT difficulty tier, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JlptLevel {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl JlptLevel {
    pub const ALL: [JlptLevel; 5] = [Self::N5, Self::N4, Self::N3, Self::N2, Self::N1];

    pub fn label(&self) -> &'static str {
        match self {
            Self::N5 => "N5",
            Self::N4 => "N4",
            Self::N3 => "N3",
            Self::N2 => "N2",
            Self::N1 => "N1",
        }
    }

    /// Badge colour used by the level list
    pub fn color(&self) -> &'static str {
        match self {
            Self::N5 => "green",
            Self::N4 => "blue",
            Self::N3 => "orange",
            Self::N2 => "purple",
            Self::N1 => "red",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::N5 => "初级",
            Self::N4 => "初中级",
            Self::N3 => "中级",
            Self::N2 => "中高级",
            Self::N1 => "高级",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSentence {
    pub japanese: String,
    pub reading: String,
    pub chinese: String,
    #[serde(default)]
    pub audio_file_name: Option<String>,
}

impl ExampleSentence {
    pub fn playback_request(&self) -> PlaybackRequest {
        PlaybackRequest {
            text: self.japanese.clone(),
            audio_file_name: self.audio_file_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub word: String,
    pub reading: String,
    pub meaning: String,
    pub part_of_speech: String,
    pub level: JlptLevel,
    #[serde(default)]
    pub examples: Vec<ExampleSentence>,
    #[serde(default)]
    pub audio_file_name: Option<String>,
}

impl Vocabulary {
    pub fn playback_request(&self) -> PlaybackRequest {
        PlaybackRequest {
            text: self.word.clone(),
            audio_file_name: self.audio_file_name.clone(),
        }
    }
}
