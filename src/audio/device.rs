// Process-wide output device handle
// Activation is attempted at startup and retried lazily on later use

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use super::output::AudioOutput;
use crate::error::Result;

pub struct AudioDevice {
    output: Mutex<Option<Arc<AudioOutput>>>,
    volume: Mutex<f32>,
}

impl AudioDevice {
    /// Create the handle and try to activate the device once. Failure is
    /// logged, not returned: the next `output()` call tries again.
    pub fn open(volume: f32) -> Self {
        let device = Self::inactive(volume);
        if let Err(e) = device.output() {
            warn!("Audio device activation failed at startup: {}", e);
        }
        device
    }

    /// A handle that activates on first use
    pub fn inactive(volume: f32) -> Self {
        Self {
            output: Mutex::new(None),
            volume: Mutex::new(volume.clamp(0.0, 1.0)),
        }
    }

    /// The active output, activating the device if needed
    pub fn output(&self) -> Result<Arc<AudioOutput>> {
        let mut slot = self.output.lock();
        if let Some(output) = slot.as_ref() {
            return Ok(output.clone());
        }

        let output = Arc::new(AudioOutput::new()?);
        output.set_volume(*self.volume.lock());
        info!(
            "Audio device active: {}Hz, {} channels",
            output.sample_rate(),
            output.channels()
        );
        *slot = Some(output.clone());
        Ok(output)
    }

    pub fn is_active(&self) -> bool {
        self.output.lock().is_some()
    }

    pub fn set_volume(&self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        *self.volume.lock() = volume;
        if let Some(output) = self.output.lock().as_ref() {
            output.set_volume(volume);
        }
    }

    pub fn volume(&self) -> f32 {
        *self.volume.lock()
    }
}
