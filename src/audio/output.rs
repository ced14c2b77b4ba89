// Audio output using cpal
// Handles cross-platform audio output with a ring buffer

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use parking_lot::Mutex;
use ringbuf::{HeapRb, traits::{Consumer, Observer, Producer, Split}};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

use crate::error::{Error, Result};

const RING_BUFFER_SIZE: usize = 48000 * 2 / 4; // ~250ms of stereo audio at 48kHz

type RingProducer = ringbuf::HeapProd<f32>;
type RingConsumer = ringbuf::HeapCons<f32>;

/// State shared between the writer side and the device callback
struct Shared {
    volume: Mutex<f32>,
    clear_flag: AtomicBool,
    paused: AtomicBool,
}

pub struct AudioOutput {
    producer: Mutex<RingProducer>,
    shared: Arc<Shared>,
    sample_rate: u32,
    channels: u16,
    // Dropping this ends the stream thread, which drops the stream
    _shutdown: mpsc::Sender<()>,
}

impl AudioOutput {
    /// Create a new audio output with the default device.
    ///
    /// cpal streams are not `Send`, so the stream lives on its own thread
    /// for as long as this value exists.
    pub fn new() -> Result<Self> {
        let rb = HeapRb::<f32>::new(RING_BUFFER_SIZE);
        let (producer, consumer) = rb.split();

        let shared = Arc::new(Shared {
            volume: Mutex::new(1.0),
            clear_flag: AtomicBool::new(false),
            paused: AtomicBool::new(false),
        });

        let (ready_tx, ready_rx) = mpsc::channel::<Result<(u32, u16)>>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let stream_shared = shared.clone();

        thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || {
                let stream = match Self::open_stream(consumer, stream_shared) {
                    Ok((stream, rate, channels)) => {
                        let _ = ready_tx.send(Ok((rate, channels)));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                // Blocks until the AudioOutput is dropped
                let _ = shutdown_rx.recv();
                drop(stream);
                debug!("Audio output stream closed");
            })
            .map_err(|e| Error::DeviceSession(format!("Failed to spawn output thread: {}", e)))?;

        let (sample_rate, channels) = ready_rx
            .recv()
            .map_err(|_| Error::DeviceSession("Output thread exited during setup".to_string()))??;

        debug!("Audio output ready: {}Hz, {} channels", sample_rate, channels);

        Ok(Self {
            producer: Mutex::new(producer),
            shared,
            sample_rate,
            channels,
            _shutdown: shutdown_tx,
        })
    }

    fn open_stream(consumer: RingConsumer, shared: Arc<Shared>) -> Result<(Stream, u32, u16)> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::DeviceSession("No output device available".to_string()))?;

        let config = device
            .default_output_config()
            .map_err(|e| Error::DeviceSession(format!("Failed to get default output config: {}", e)))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(&device, &config.into(), consumer, shared)?,
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(&device, &config.into(), consumer, shared)?,
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(&device, &config.into(), consumer, shared)?,
            format => {
                return Err(Error::DeviceSession(format!("Unsupported sample format: {:?}", format)))
            }
        };

        stream
            .play()
            .map_err(|e| Error::DeviceSession(format!("Failed to start stream: {}", e)))?;

        Ok((stream, sample_rate, channels))
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &StreamConfig,
        mut consumer: RingConsumer,
        shared: Arc<Shared>,
    ) -> Result<Stream> {
        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    // If clear flag is set, drain the buffer and output silence
                    if shared.clear_flag.swap(false, Ordering::SeqCst) {
                        while consumer.try_pop().is_some() {}
                    }

                    // Paused: hold buffered samples so playback resumes in place
                    if shared.paused.load(Ordering::SeqCst) {
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0);
                        }
                        return;
                    }

                    let vol = *shared.volume.lock();
                    for sample in data.iter_mut() {
                        let value = consumer.try_pop().unwrap_or(0.0) * vol;
                        *sample = T::from_sample(value);
                    }
                },
                move |err| {
                    error!("Audio output error: {}", err);
                },
                None,
            )
            .map_err(|e| Error::DeviceSession(format!("Failed to build output stream: {}", e)))?;

        Ok(stream)
    }

    /// Write samples to the output buffer.
    /// Returns the number of samples actually written.
    pub fn write(&self, samples: &[f32]) -> usize {
        self.producer.lock().push_slice(samples)
    }

    /// Samples queued but not yet played
    pub fn buffered(&self) -> usize {
        self.producer.lock().occupied_len()
    }

    /// Drop everything queued. Takes effect on the next device callback.
    pub fn clear(&self) {
        self.shared.clear_flag.store(true, Ordering::SeqCst);
    }

    /// A clear was requested and the device has not yet performed it
    pub fn clear_pending(&self) -> bool {
        self.shared.clear_flag.load(Ordering::SeqCst)
    }

    pub fn set_paused(&self, paused: bool) {
        self.shared.paused.store(paused, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Set the output volume (0.0 to 1.0)
    pub fn set_volume(&self, vol: f32) {
        *self.shared.volume.lock() = vol.clamp(0.0, 1.0);
    }
}
