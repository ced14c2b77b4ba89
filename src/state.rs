// Application state management
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

use crate::audio::{AudioDevice, RecordedPlayer};
use crate::library::ClipResolver;
use crate::playback::PlaybackController;
use crate::settings::AppSettings;
use crate::speech::{SpeechCommand, SynthesizedSpeaker, SystemSpeechEngine};

pub struct AppState {
    pub controller: Arc<PlaybackController>,
    pub device: Arc<AudioDevice>,
    pub settings: Mutex<AppSettings>,
    pub app_dir: PathBuf,
}

impl AppState {
    /// Load settings from `app_dir`, index the bundled clips and wire the
    /// playback controller to the real device and speech engine.
    pub fn new(app_dir: PathBuf, runtime: &Handle) -> Result<Self> {
        let settings = AppSettings::load(&app_dir)
            .with_context(|| format!("Failed to load settings from {:?}", app_dir))?;

        let asset_dir = settings.asset_dir(&app_dir);
        let resolver = ClipResolver::scan(&asset_dir, &settings.audio.clip_extensions);

        let device = Arc::new(AudioDevice::open(settings.audio.volume));
        let clips = Arc::new(RecordedPlayer::new(device.clone()));

        let command = SpeechCommand::from_settings(&settings.speech);
        info!("Speech fallback via {} ({:?})", command.program, command.voice);
        let engine = SystemSpeechEngine::new(command, runtime.clone());
        let speaker = Arc::new(SynthesizedSpeaker::new(
            Box::new(engine),
            settings.speech.seconds_per_char,
            runtime.clone(),
        ));

        let controller = PlaybackController::new(resolver, clips, speaker, runtime);

        Ok(Self::from_parts(controller, device, settings, app_dir))
    }

    pub fn from_parts(
        controller: Arc<PlaybackController>,
        device: Arc<AudioDevice>,
        settings: AppSettings,
        app_dir: PathBuf,
    ) -> Self {
        Self {
            controller,
            device,
            settings: Mutex::new(settings),
            app_dir,
        }
    }
}
