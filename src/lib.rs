// JLPT Audio - pronunciation playback for a vocabulary app
// Module declarations
pub mod audio;
pub mod catalog;
pub mod commands;
pub mod error;
pub mod library;
pub mod playback;
pub mod settings;
pub mod speech;
pub mod state;

pub use error::{Error, Result};
pub use playback::{PlaybackController, PlaybackRequest, PlaybackState};
pub use state::AppState;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber. Honors `RUST_LOG`; safe to call
/// more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "jlpt_audio=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
