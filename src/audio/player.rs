// Recorded clip player
// Decodes a bundled clip on a feeder thread and streams it to the device
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::decoder::AudioDecoder;
use super::device::AudioDevice;
use super::output::AudioOutput;
use super::resampler::Resampler;
use crate::error::{Error, Result};
use crate::library::AudioResource;
use crate::playback::backend::ClipPlayer;
use crate::playback::events::Notifier;

/// How long the device may go without consuming samples before the clip
/// is reported as failed
const STALL_TIMEOUT: Duration = Duration::from_secs(3);
/// Upper bound on waiting for a previous clip's buffer to be cleared
const CLEAR_TIMEOUT: Duration = Duration::from_millis(200);
const POLL_INTERVAL: Duration = Duration::from_millis(2);

struct ActiveClip {
    cancelled: Arc<AtomicBool>,
    control: Arc<Mutex<OutputControl>>,
}

/// Pause state and the output once the feeder has acquired it. Pause and
/// resume may arrive before the device is ready.
#[derive(Default)]
struct OutputControl {
    output: Option<Arc<AudioOutput>>,
    paused: bool,
}

pub struct RecordedPlayer {
    device: Arc<AudioDevice>,
    active: Mutex<Option<ActiveClip>>,
}

impl RecordedPlayer {
    pub fn new(device: Arc<AudioDevice>) -> Self {
        Self {
            device,
            active: Mutex::new(None),
        }
    }

    fn set_paused(&self, paused: bool) {
        if let Some(clip) = self.active.lock().as_ref() {
            let mut control = clip.control.lock();
            control.paused = paused;
            if let Some(output) = &control.output {
                output.set_paused(paused);
            }
        }
    }
}

impl ClipPlayer for RecordedPlayer {
    /// Returns as soon as the feeder thread is running. Opening, decoding
    /// and device activation happen there; failures are reported through
    /// `notifier`.
    fn start(&self, resource: &AudioResource, notifier: Notifier) -> Result<()> {
        // Stop current playback if any
        self.stop();

        let cancelled = Arc::new(AtomicBool::new(false));
        let control = Arc::new(Mutex::new(OutputControl::default()));
        let feeder = Feeder {
            path: resource.path().to_path_buf(),
            device: self.device.clone(),
            control: control.clone(),
            cancelled: cancelled.clone(),
        };
        let session = notifier.session();

        thread::Builder::new()
            .name("clip-feeder".to_string())
            .spawn(move || match feeder.run() {
                Ok(FeedOutcome::Finished) => notifier.finished(),
                Ok(FeedOutcome::Cancelled) => debug!("Clip feeder for session {} cancelled", session),
                Err(e) => {
                    warn!("Clip for session {} failed: {}", session, e);
                    notifier.failed(e.to_string())
                }
            })?;

        debug!("Started clip '{}' for session {}", resource.name(), session);
        *self.active.lock() = Some(ActiveClip { cancelled, control });
        Ok(())
    }

    fn pause(&self) {
        self.set_paused(true);
    }

    fn resume(&self) {
        self.set_paused(false);
    }

    fn stop(&self) {
        if let Some(clip) = self.active.lock().take() {
            clip.cancelled.store(true, Ordering::SeqCst);
            let control = clip.control.lock();
            if let Some(output) = &control.output {
                output.clear();
                output.set_paused(false);
            }
        }
    }
}

enum FeedOutcome {
    Finished,
    Cancelled,
}

/// Runs on the feeder thread for one clip
struct Feeder {
    path: PathBuf,
    device: Arc<AudioDevice>,
    control: Arc<Mutex<OutputControl>>,
    cancelled: Arc<AtomicBool>,
}

impl Feeder {
    fn run(self) -> Result<FeedOutcome> {
        // A broken clip fails here, before the device is touched
        let mut decoder = AudioDecoder::open(&self.path)?;
        let Some(first) = decoder.decode_next()? else {
            return Err(Error::Decode(format!("{} contains no audio", self.path.display())));
        };

        if self.is_cancelled() {
            return Ok(FeedOutcome::Cancelled);
        }
        let output = self.device.output()?;
        {
            let mut control = self.control.lock();
            if self.is_cancelled() {
                return Ok(FeedOutcome::Cancelled);
            }
            output.set_paused(control.paused);
            control.output = Some(output.clone());
        }

        let resampler = Resampler::new(
            decoder.sample_rate(),
            output.sample_rate(),
            decoder.channels(),
            output.channels() as usize,
        )?;

        ClipStream {
            decoder,
            resampler,
            output,
            cancelled: self.cancelled,
        }
        .run(first)
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Decode-resample-write loop once the output is ready
struct ClipStream {
    decoder: AudioDecoder,
    resampler: Resampler,
    output: Arc<AudioOutput>,
    cancelled: Arc<AtomicBool>,
}

impl ClipStream {
    fn run(mut self, first: Vec<f32>) -> Result<FeedOutcome> {
        self.wait_for_clear();

        let mut block = Some(first);
        while let Some(samples) = block {
            let converted = self.resampler.process(&samples)?;
            if !self.write_all(&converted)? {
                return Ok(FeedOutcome::Cancelled);
            }
            block = self.decoder.decode_next()?;
        }

        let tail = self.resampler.flush()?;
        if !self.write_all(&tail)? {
            return Ok(FeedOutcome::Cancelled);
        }

        // Wait for the device to play out what is queued
        let mut watchdog = Watchdog::new(self.output.buffered());
        while self.output.buffered() > 0 {
            if self.is_cancelled() {
                return Ok(FeedOutcome::Cancelled);
            }
            watchdog.check(self.output.buffered(), self.output.is_paused())?;
            thread::sleep(POLL_INTERVAL);
        }

        Ok(if self.is_cancelled() {
            FeedOutcome::Cancelled
        } else {
            FeedOutcome::Finished
        })
    }

    /// Returns false if cancelled before everything was queued
    fn write_all(&self, samples: &[f32]) -> Result<bool> {
        let mut remaining = samples;
        let mut watchdog = Watchdog::new(self.output.buffered());

        while !remaining.is_empty() {
            if self.is_cancelled() {
                return Ok(false);
            }
            let written = self.output.write(remaining);
            if written > 0 {
                remaining = &remaining[written..];
                watchdog.reset(self.output.buffered());
            } else {
                // Buffer full, wait a bit
                watchdog.check(self.output.buffered(), self.output.is_paused())?;
                thread::sleep(POLL_INTERVAL);
            }
        }

        Ok(true)
    }

    fn wait_for_clear(&self) {
        let started = Instant::now();
        while self.output.clear_pending() && started.elapsed() < CLEAR_TIMEOUT {
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Detects a device that stopped pulling samples while not paused
struct Watchdog {
    last_buffered: usize,
    since: Instant,
}

impl Watchdog {
    fn new(buffered: usize) -> Self {
        Self {
            last_buffered: buffered,
            since: Instant::now(),
        }
    }

    fn reset(&mut self, buffered: usize) {
        self.last_buffered = buffered;
        self.since = Instant::now();
    }

    fn check(&mut self, buffered: usize, paused: bool) -> Result<()> {
        if paused || buffered < self.last_buffered {
            self.reset(buffered);
            return Ok(());
        }
        if self.since.elapsed() > STALL_TIMEOUT {
            warn!("Audio output stalled with {} samples queued", buffered);
            return Err(Error::DeviceSession("Audio output stalled".to_string()));
        }
        Ok(())
    }
}
