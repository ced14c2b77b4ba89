// Synthesized speech fallback
// The engine gives no completion signal, so completion is estimated from
// the length of the text
use parking_lot::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use super::engine::SpeechEngine;
use crate::error::Result;
use crate::playback::backend::Speaker;
use crate::playback::events::Notifier;

pub struct SynthesizedSpeaker {
    engine: Box<dyn SpeechEngine>,
    seconds_per_char: f64,
    runtime: Handle,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl SynthesizedSpeaker {
    pub fn new(engine: Box<dyn SpeechEngine>, seconds_per_char: f64, runtime: Handle) -> Self {
        Self {
            engine,
            seconds_per_char: seconds_per_char.max(0.0),
            runtime,
            timer: Mutex::new(None),
        }
    }

    /// Estimated speaking time: characters times the fixed per-character rate
    pub fn estimated_duration(&self, text: &str) -> Duration {
        Duration::from_secs_f64(text.chars().count() as f64 * self.seconds_per_char)
    }
}

impl Speaker for SynthesizedSpeaker {
    fn speak(&self, text: &str, notifier: Notifier) -> Result<()> {
        self.stop();
        self.engine.start(text)?;

        let estimate = self.estimated_duration(text);
        let deadline = {
            let _guard = self.runtime.enter();
            tokio::time::Instant::now() + estimate
        };
        debug!(
            "Speaking {} chars for session {}, done in ~{:?}",
            text.chars().count(),
            notifier.session(),
            estimate
        );

        let timer = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            notifier.finished();
        });
        *self.timer.lock() = Some(timer);
        Ok(())
    }

    fn stop(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }
        self.engine.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::playback::events::{BackendEvent, SessionId};
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingEngine {
        spoken: Mutex<Vec<String>>,
        cancels: Mutex<usize>,
        unavailable: bool,
    }

    impl SpeechEngine for Arc<RecordingEngine> {
        fn start(&self, text: &str) -> Result<()> {
            if self.unavailable {
                return Err(Error::SynthesisUnavailable("no voice".to_string()));
            }
            self.spoken.lock().push(text.to_string());
            Ok(())
        }

        fn cancel(&self) {
            *self.cancels.lock() += 1;
        }
    }

    fn speaker(engine: &Arc<RecordingEngine>) -> SynthesizedSpeaker {
        SynthesizedSpeaker::new(Box::new(engine.clone()), 0.2, Handle::current())
    }

    #[tokio::test]
    async fn test_estimate_counts_characters() {
        let engine = Arc::new(RecordingEngine::default());
        let speaker = speaker(&engine);
        assert_eq!(speaker.estimated_duration("こんにちは"), Duration::from_secs(1));
        assert_eq!(speaker.estimated_duration(""), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_finished_after_estimate() {
        let engine = Arc::new(RecordingEngine::default());
        let speaker = speaker(&engine);
        let (notifier, mut rx) = Notifier::channel(SessionId::new(3));

        speaker.speak("水", notifier).unwrap();
        assert_eq!(*engine.spoken.lock(), vec!["水"]);

        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(rx.try_recv().is_err());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.session, SessionId::new(3));
        assert_eq!(event.event, BackendEvent::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_suppresses_completion() {
        let engine = Arc::new(RecordingEngine::default());
        let speaker = speaker(&engine);
        let (notifier, mut rx) = Notifier::channel(SessionId::new(1));

        speaker.speak("学校", notifier).unwrap();
        speaker.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(rx.try_recv().is_err());
        assert!(*engine.cancels.lock() >= 1);
    }

    #[tokio::test]
    async fn test_unavailable_engine_starts_no_timer() {
        let engine = Arc::new(RecordingEngine {
            unavailable: true,
            ..Default::default()
        });
        let speaker = speaker(&engine);
        let (notifier, _rx) = Notifier::channel(SessionId::new(1));

        assert!(matches!(
            speaker.speak("水", notifier),
            Err(Error::SynthesisUnavailable(_))
        ));
        assert!(speaker.timer.lock().is_none());
    }
}
