// UI command handlers
// Playback commands never fail: the UI learns the outcome from the state
use serde::Serialize;
use tracing::warn;

use crate::catalog::{ExampleSentence, Vocabulary};
use crate::playback::{PlaybackRequest, PlaybackState};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStateResponse {
    pub is_playing: bool,
    pub is_paused: bool,
    pub current_key: String,
}

impl From<&PlaybackState> for PlayerStateResponse {
    fn from(state: &PlaybackState) -> Self {
        Self {
            is_playing: state.is_playing(),
            is_paused: matches!(state, PlaybackState::Paused(_)),
            current_key: state.current_key().to_string(),
        }
    }
}

pub fn play_vocabulary(vocabulary: &Vocabulary, state: &AppState) -> PlayerStateResponse {
    state.controller.play(vocabulary.playback_request());
    get_player_state(state)
}

pub fn play_example(example: &ExampleSentence, state: &AppState) -> PlayerStateResponse {
    state.controller.play(example.playback_request());
    get_player_state(state)
}

pub fn play_text(
    text: String,
    audio_file_name: Option<String>,
    state: &AppState,
) -> PlayerStateResponse {
    state.controller.play(PlaybackRequest {
        text,
        audio_file_name,
    });
    get_player_state(state)
}

/// The word card's play/pause button
pub fn toggle_vocabulary(vocabulary: &Vocabulary, state: &AppState) -> PlayerStateResponse {
    state.controller.toggle(vocabulary.playback_request());
    get_player_state(state)
}

pub fn pause_playback(state: &AppState) -> PlayerStateResponse {
    state.controller.pause();
    get_player_state(state)
}

pub fn resume_playback(state: &AppState) -> PlayerStateResponse {
    state.controller.resume();
    get_player_state(state)
}

pub fn stop_playback(state: &AppState) -> PlayerStateResponse {
    state.controller.stop();
    get_player_state(state)
}

/// Apply and persist the output volume
pub fn set_volume(volume: f32, state: &AppState) -> Result<(), String> {
    let volume = volume.clamp(0.0, 1.0);
    state.device.set_volume(volume);

    let mut settings = state.settings.lock();
    settings.audio.volume = volume;
    settings.save(&state.app_dir).map_err(|e| {
        warn!("Failed to persist volume: {}", e);
        format!("Failed to save settings: {}", e)
    })
}

pub fn get_player_state(state: &AppState) -> PlayerStateResponse {
    PlayerStateResponse::from(&state.controller.state())
}
