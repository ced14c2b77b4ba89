//! Recording fakes for the backend traits

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jlpt_audio::error::{Error, Result};
use jlpt_audio::library::AudioResource;
use jlpt_audio::playback::{ClipPlayer, Notifier, Speaker};
use jlpt_audio::speech::SpeechEngine;

/// Clip player that records calls and keeps every notifier it was given
#[derive(Default)]
pub struct FakeClips {
    calls: Mutex<Vec<String>>,
    notifiers: Mutex<Vec<Notifier>>,
    pub fail_start: AtomicBool,
}

impl FakeClips {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn started(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("start ").map(str::to_string))
            .collect()
    }

    /// Notifier handed to the n-th successful start
    pub fn notifier(&self, n: usize) -> Notifier {
        self.notifiers.lock()[n].clone()
    }
}

impl ClipPlayer for FakeClips {
    fn start(&self, resource: &AudioResource, notifier: Notifier) -> Result<()> {
        self.calls.lock().push(format!("start {}", resource.name()));
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Error::Decode("unsupported codec".to_string()));
        }
        self.notifiers.lock().push(notifier);
        Ok(())
    }

    fn pause(&self) {
        self.calls.lock().push("pause".to_string());
    }

    fn resume(&self) {
        self.calls.lock().push("resume".to_string());
    }

    fn stop(&self) {
        self.calls.lock().push("stop".to_string());
    }
}

/// Speaker that records utterances; never finishes on its own
#[derive(Default)]
pub struct FakeSpeaker {
    spoken: Mutex<Vec<String>>,
    notifiers: Mutex<Vec<Notifier>>,
    pub unavailable: AtomicBool,
}

impl FakeSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }

    pub fn notifier(&self, n: usize) -> Notifier {
        self.notifiers.lock()[n].clone()
    }
}

impl Speaker for FakeSpeaker {
    fn speak(&self, text: &str, notifier: Notifier) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::SynthesisUnavailable("voice ja-JP not installed".to_string()));
        }
        self.spoken.lock().push(text.to_string());
        self.notifiers.lock().push(notifier);
        Ok(())
    }

    fn stop(&self) {}
}

/// Speech engine standing in for the system command. Clones share state.
#[derive(Default, Clone)]
pub struct FakeEngine {
    spoken: Arc<Mutex<Vec<String>>>,
    cancels: Arc<Mutex<usize>>,
}

impl FakeEngine {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }

    pub fn cancels(&self) -> usize {
        *self.cancels.lock()
    }
}

impl SpeechEngine for FakeEngine {
    fn start(&self, text: &str) -> Result<()> {
        self.spoken.lock().push(text.to_string());
        Ok(())
    }

    fn cancel(&self) {
        *self.cancels.lock() += 1;
    }
}
