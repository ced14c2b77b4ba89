// Speech synthesis module
// Fallback voice for keys without a recorded clip

pub mod engine;
pub mod speaker;

pub use engine::{CommandStyle, SpeechCommand, SpeechEngine, SystemSpeechEngine};
pub use speaker::SynthesizedSpeaker;
