//! Streaming sample-rate and channel conversion
//!
//! Decoded clips arrive in their own rate and channel layout; the output
//! device wants its own. Frames are mapped to the device channel count
//! first, then fed through rubato in fixed-size chunks.

use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

use crate::error::{Error, Result};

/// Input frames per rubato chunk
const CHUNK_FRAMES: usize = 1024;

pub struct Resampler {
    inner: Option<FastFixedIn<f32>>,
    in_channels: usize,
    out_channels: usize,
    /// Planar frames waiting for a full chunk, already in the output layout
    pending: Vec<Vec<f32>>,
}

impl Resampler {
    pub fn new(input_rate: u32, output_rate: u32, in_channels: usize, out_channels: usize) -> Result<Self> {
        if in_channels == 0 || out_channels == 0 {
            return Err(Error::Decode("Channel count must be non-zero".to_string()));
        }

        let inner = if input_rate == output_rate {
            None
        } else {
            debug!(
                "Resampling {}Hz/{}ch -> {}Hz/{}ch",
                input_rate, in_channels, output_rate, out_channels
            );
            let resampler = FastFixedIn::<f32>::new(
                output_rate as f64 / input_rate as f64,
                1.0, // fixed ratio
                PolynomialDegree::Cubic,
                CHUNK_FRAMES,
                out_channels,
            )
            .map_err(|e| Error::Decode(format!("Failed to create resampler: {}", e)))?;
            Some(resampler)
        };

        Ok(Self {
            inner,
            in_channels,
            out_channels,
            pending: vec![Vec::new(); out_channels],
        })
    }

    /// Convert a block of interleaved input samples. May return fewer frames
    /// than supplied while a chunk fills up.
    pub fn process(&mut self, interleaved: &[f32]) -> Result<Vec<f32>> {
        self.push_mapped(interleaved);

        let Some(resampler) = self.inner.as_mut() else {
            return Ok(Self::drain_all(&mut self.pending));
        };

        let mut out = Vec::new();
        while self.pending[0].len() >= resampler.input_frames_next() {
            let needed = resampler.input_frames_next();
            let chunk: Vec<Vec<f32>> = self
                .pending
                .iter_mut()
                .map(|ch| ch.drain(..needed).collect())
                .collect();
            let planar = resampler
                .process(&chunk, None)
                .map_err(|e| Error::Decode(format!("Resampling failed: {}", e)))?;
            Self::interleave_into(&planar, &mut out);
        }
        Ok(out)
    }

    /// Emit whatever is still buffered at end of stream
    pub fn flush(&mut self) -> Result<Vec<f32>> {
        let Some(resampler) = self.inner.as_mut() else {
            return Ok(Self::drain_all(&mut self.pending));
        };

        let mut out = Vec::new();
        if !self.pending[0].is_empty() {
            let planar = resampler
                .process_partial(Some(self.pending.as_slice()), None)
                .map_err(|e| Error::Decode(format!("Resampling failed: {}", e)))?;
            Self::interleave_into(&planar, &mut out);
            self.pending.iter_mut().for_each(Vec::clear);
        }
        let tail = resampler
            .process_partial::<Vec<f32>>(None, None)
            .map_err(|e| Error::Decode(format!("Resampling failed: {}", e)))?;
        Self::interleave_into(&tail, &mut out);
        Ok(out)
    }

    fn push_mapped(&mut self, interleaved: &[f32]) {
        for frame in interleaved.chunks_exact(self.in_channels) {
            if self.out_channels == 1 && self.in_channels > 1 {
                let sum: f32 = frame.iter().sum();
                self.pending[0].push(sum / self.in_channels as f32);
            } else {
                for (ch, plane) in self.pending.iter_mut().enumerate() {
                    plane.push(frame[ch % self.in_channels]);
                }
            }
        }
    }

    fn drain_all(pending: &mut [Vec<f32>]) -> Vec<f32> {
        let mut out = Vec::new();
        Self::interleave_into(pending, &mut out);
        pending.iter_mut().for_each(Vec::clear);
        out
    }

    fn interleave_into(planar: &[Vec<f32>], out: &mut Vec<f32>) {
        let frames = planar.first().map(Vec::len).unwrap_or(0);
        out.reserve(frames * planar.len());
        for frame in 0..frames {
            for plane in planar {
                out.push(plane[frame]);
            }
        }
    }
}
