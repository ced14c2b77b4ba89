// Observable playback state
use serde::{Serialize, Serializer};
use tokio::sync::{broadcast, watch};

/// Transitions buffered per lagging subscriber
const TRANSITION_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(String),
    Paused(String),
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing(_))
    }

    /// Key of the current session, empty when idle
    pub fn current_key(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Playing(key) | Self::Paused(key) => key,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// UI shape: `{ "is_playing": bool, "current_key": string }`
impl Serialize for PlaybackState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("PlaybackState", 2)?;
        s.serialize_field("is_playing", &self.is_playing())?;
        s.serialize_field("current_key", self.current_key())?;
        s.end()
    }
}

/// Publishes state changes synchronously: the latest value through a watch
/// channel and every transition, in order, through a broadcast channel.
pub struct StatePublisher {
    latest: watch::Sender<PlaybackState>,
    transitions: broadcast::Sender<PlaybackState>,
}

impl StatePublisher {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(PlaybackState::Idle);
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            latest,
            transitions,
        }
    }

    /// Publish `state` if it differs from the current one. Returns whether
    /// a transition happened.
    pub fn publish(&self, state: PlaybackState) -> bool {
        if *self.latest.borrow() == state {
            return false;
        }
        self.latest.send_replace(state.clone());
        let _ = self.transitions.send(state);
        true
    }

    pub fn current(&self) -> PlaybackState {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.latest.subscribe()
    }

    pub fn transitions(&self) -> broadcast::Receiver<PlaybackState> {
        self.transitions.subscribe()
    }
}

impl Default for StatePublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_accessors() {
        assert!(!PlaybackState::Idle.is_playing());
        assert_eq!(PlaybackState::Idle.current_key(), "");

        let playing = PlaybackState::Playing("水".to_string());
        assert!(playing.is_playing());
        assert_eq!(playing.current_key(), "水");

        let paused = PlaybackState::Paused("水".to_string());
        assert!(!paused.is_playing());
        assert_eq!(paused.current_key(), "水");
    }

    #[test]
    fn test_serializes_ui_pair() {
        let json = serde_json::to_value(PlaybackState::Paused("学校".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({ "is_playing": false, "current_key": "学校" }));
    }

    #[test]
    fn test_publish_skips_unchanged_state() {
        let publisher = StatePublisher::new();
        let mut transitions = publisher.transitions();
        let watcher = publisher.subscribe();

        assert!(!publisher.publish(PlaybackState::Idle));
        assert!(publisher.publish(PlaybackState::Playing("a".to_string())));
        assert!(!publisher.publish(PlaybackState::Playing("a".to_string())));
        assert!(publisher.publish(PlaybackState::Idle));

        assert_eq!(*watcher.borrow(), PlaybackState::Idle);
        assert_eq!(transitions.try_recv().unwrap(), PlaybackState::Playing("a".to_string()));
        assert_eq!(transitions.try_recv().unwrap(), PlaybackState::Idle);
        assert!(transitions.try_recv().is_err());
    }
}
