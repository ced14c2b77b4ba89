// Settings module
// Persisted app configuration (clip store, output, speech)

#[allow(clippy::module_inception)]
pub mod settings;

pub use settings::{AppSettings, AudioSettings, SpeechSettings};
