// Audio playback module
// Uses Symphonia for decoding and cpal for output

pub mod decoder;
pub mod device;
pub mod output;
pub mod player;
pub mod resampler;

pub use decoder::AudioDecoder;
pub use device::AudioDevice;
pub use output::AudioOutput;
pub use player::RecordedPlayer;
pub use resampler::Resampler;
