// Platform speech engine
// Drives the system speech command with a fixed voice and rate
use parking_lot::Mutex;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::settings::SpeechSettings;

/// Anything that can start and cancel an utterance
pub trait SpeechEngine: Send + Sync {
    fn start(&self, text: &str) -> Result<()>;

    /// Best-effort; no-op when nothing is being spoken
    fn cancel(&self);
}

/// Argument conventions of the supported speech commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStyle {
    /// macOS `say -v <voice> -r <wpm>`
    Say,
    /// `espeak-ng -v <voice> -s <wpm>`
    Espeak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCommand {
    pub program: String,
    pub style: CommandStyle,
    pub voice: Option<String>,
    pub words_per_minute: u32,
}

impl SpeechCommand {
    pub fn from_settings(settings: &SpeechSettings) -> Self {
        let program = settings.program.clone().unwrap_or_else(|| {
            if cfg!(target_os = "macos") {
                "say".to_string()
            } else {
                "espeak-ng".to_string()
            }
        });

        let style = match Path::new(&program).file_stem().and_then(|s| s.to_str()) {
            Some("say") => CommandStyle::Say,
            _ => CommandStyle::Espeak,
        };

        let voice = settings
            .voice
            .clone()
            .or_else(|| default_voice(style, &settings.language));

        Self {
            program,
            style,
            voice,
            words_per_minute: settings.words_per_minute,
        }
    }

    pub fn args(&self, text: &str) -> Vec<String> {
        let (voice_flag, rate_flag) = match self.style {
            CommandStyle::Say => ("-v", "-r"),
            CommandStyle::Espeak => ("-v", "-s"),
        };

        let mut args = Vec::with_capacity(6);
        if let Some(voice) = &self.voice {
            args.push(voice_flag.to_string());
            args.push(voice.clone());
        }
        args.push(rate_flag.to_string());
        args.push(self.words_per_minute.to_string());
        // Text starting with '-' must not be read as an option
        args.push("--".to_string());
        args.push(text.to_string());
        args
    }
}

fn default_voice(style: CommandStyle, language: &str) -> Option<String> {
    let primary = language.split(['-', '_']).next().unwrap_or("").to_lowercase();
    if primary.is_empty() {
        return None;
    }
    match style {
        CommandStyle::Say => match primary.as_str() {
            "ja" => Some("Kyoko".to_string()),
            _ => None,
        },
        CommandStyle::Espeak => Some(primary),
    }
}

/// Speaks through a child process, one utterance at a time
pub struct SystemSpeechEngine {
    command: SpeechCommand,
    runtime: Handle,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
}

impl SystemSpeechEngine {
    pub fn new(command: SpeechCommand, runtime: Handle) -> Self {
        Self {
            command,
            runtime,
            cancel: Mutex::new(None),
        }
    }
}

impl SpeechEngine for SystemSpeechEngine {
    fn start(&self, text: &str) -> Result<()> {
        self.cancel();

        let _guard = self.runtime.enter();
        let mut child = Command::new(&self.command.program)
            .args(self.command.args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::SynthesisUnavailable(format!("{}: {}", self.command.program, e)))?;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        *self.cancel.lock() = Some(cancel_tx);

        let program = self.command.program.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                status = child.wait() => match status {
                    Ok(status) if status.success() => debug!("{} finished", program),
                    Ok(status) => warn!("{} exited with {}", program, status),
                    Err(e) => warn!("Failed to wait for {}: {}", program, e),
                },
                _ = cancel_rx => {
                    let _ = child.kill().await;
                    debug!("{} cancelled", program);
                }
            }
        });

        Ok(())
    }

    fn cancel(&self) {
        if let Some(cancel) = self.cancel.lock().take() {
            let _ = cancel.send(());
        }
    }
}
