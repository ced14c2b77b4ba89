//! Shared test helpers
//!
//! Recording fakes for the playback seams, WAV generation for decoder
//! tests, and small async utilities.

#![allow(dead_code)]

pub mod audio_generator;
pub mod fakes;

use std::sync::Arc;
use std::time::Duration;

use jlpt_audio::library::ClipResolver;
use jlpt_audio::playback::{PlaybackController, PlaybackState, Speaker};
use jlpt_audio::speech::SynthesizedSpeaker;
use tokio::runtime::Handle;

pub use fakes::{FakeClips, FakeEngine, FakeSpeaker};

/// Let spawned tasks (event loop, timers already due) run
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Wait until the controller reaches `expected`
pub async fn wait_for_state(controller: &PlaybackController, expected: PlaybackState) {
    let mut rx = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(30), rx.wait_for(|s| *s == expected))
        .await
        .expect("timed out waiting for state")
        .expect("state channel closed");
}

/// Poll `condition` until it holds, for work finishing on other threads
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}

/// Controller over fake backends; `clips` names the bundled keys
pub fn fake_controller(
    clips: &Arc<FakeClips>,
    speaker: &Arc<FakeSpeaker>,
    bundled: &[&str],
) -> Arc<PlaybackController> {
    let resolver = ClipResolver::from_entries(
        bundled
            .iter()
            .map(|name| (name.to_string(), format!("/bundle/{}.mp3", name))),
    );
    PlaybackController::new(resolver, clips.clone(), speaker.clone(), &Handle::current())
}

/// Controller whose speech path is the real timed speaker over a fake engine
pub fn timed_speech_controller(
    clips: &Arc<FakeClips>,
    engine: &FakeEngine,
    bundled: &[&str],
) -> Arc<PlaybackController> {
    let resolver = ClipResolver::from_entries(
        bundled
            .iter()
            .map(|name| (name.to_string(), format!("/bundle/{}.mp3", name))),
    );
    let speaker: Arc<dyn Speaker> = Arc::new(SynthesizedSpeaker::new(
        Box::new(engine.clone()),
        0.2,
        Handle::current(),
    ));
    PlaybackController::new(resolver, clips.clone(), speaker, &Handle::current())
}
