// Playback controller
// Owns the single playback session and routes each request to a recorded
// clip or to synthesized speech
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use super::backend::{ClipPlayer, Speaker};
use super::events::{BackendEvent, Notifier, SessionEvent, SessionId};
use super::request::PlaybackRequest;
use super::state::{PlaybackState, StatePublisher};
use crate::library::ClipResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Recorded,
    Synthesized,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    id: SessionId,
    key: String,
    backend: Backend,
    paused: bool,
}

impl ActiveSession {
    fn state(&self) -> PlaybackState {
        if self.paused {
            PlaybackState::Paused(self.key.clone())
        } else {
            PlaybackState::Playing(self.key.clone())
        }
    }
}

#[derive(Default)]
struct Inner {
    last_session: Option<SessionId>,
    session: Option<ActiveSession>,
}

impl Inner {
    fn next_session(&mut self) -> SessionId {
        let id = self
            .last_session
            .map(SessionId::next)
            .unwrap_or(SessionId::new(1));
        self.last_session = Some(id);
        id
    }
}

pub struct PlaybackController {
    inner: Mutex<Inner>,
    publisher: StatePublisher,
    resolver: ClipResolver,
    clips: Arc<dyn ClipPlayer>,
    speaker: Arc<dyn Speaker>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl PlaybackController {
    /// Build the controller and start its event loop on `runtime`. Backend
    /// notifications are applied by that loop, one at a time.
    pub fn new(
        resolver: ClipResolver,
        clips: Arc<dyn ClipPlayer>,
        speaker: Arc<dyn Speaker>,
        runtime: &Handle,
    ) -> Arc<Self> {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Arc::new(Self {
            inner: Mutex::new(Inner::default()),
            publisher: StatePublisher::new(),
            resolver,
            clips,
            speaker,
            events,
        });
        runtime.spawn(Self::event_loop(Arc::downgrade(&controller), rx));
        controller
    }

    async fn event_loop(controller: Weak<Self>, mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
        while let Some(event) = rx.recv().await {
            let Some(controller) = controller.upgrade() else {
                break;
            };
            controller.apply(event);
        }
        debug!("Playback event loop stopped");
    }

    /// Play `request`, replacing whatever is playing. `Playing` is
    /// published on dispatch, before the backend has opened anything; audio
    /// starts in the background.
    pub fn play(&self, request: impl Into<PlaybackRequest>) {
        let request = request.into();
        let key = request.key().to_string();
        if key.is_empty() {
            warn!("Ignoring play request with an empty key");
            return;
        }

        let mut inner = self.inner.lock();
        self.halt(&mut inner);

        let id = inner.next_session();
        self.publisher.publish(PlaybackState::Playing(key.clone()));
        let session = self.dispatch(id, key);
        self.install(&mut inner, session);
    }

    /// Play/pause button semantics: pause or resume when `request` is the
    /// current session, otherwise start it.
    pub fn toggle(&self, request: impl Into<PlaybackRequest>) {
        let request = request.into();
        let state = self.state();
        if !state.is_idle() && state.current_key() == request.key() {
            match state {
                PlaybackState::Playing(_) => self.pause(),
                PlaybackState::Paused(_) => self.resume(),
                PlaybackState::Idle => {}
            }
        } else {
            self.play(request);
        }
    }

    /// Suspend a recorded clip. No-op when idle, already paused, or speaking.
    pub fn pause(&self) {
        let mut inner = self.inner.lock();
        let Some(session) = inner.session.as_mut() else {
            return;
        };
        if session.paused {
            return;
        }
        match session.backend {
            Backend::Recorded => {
                self.clips.pause();
                session.paused = true;
                let state = session.state();
                self.publisher.publish(state);
            }
            Backend::Synthesized => {
                self.speaker.pause();
                debug!("Pause ignored: synthesized speech cannot be paused");
            }
        }
    }

    /// Continue a paused clip. No-op unless paused.
    pub fn resume(&self) {
        let mut inner = self.inner.lock();
        let Some(session) = inner.session.as_mut() else {
            return;
        };
        if !session.paused {
            return;
        }
        self.clips.resume();
        session.paused = false;
        let state = session.state();
        self.publisher.publish(state);
    }

    /// Halt everything and return to idle. Safe to call at any time.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        self.halt(&mut inner);
    }

    pub fn state(&self) -> PlaybackState {
        self.publisher.current()
    }

    pub fn is_playing(&self) -> bool {
        self.state().is_playing()
    }

    pub fn current_key(&self) -> String {
        self.state().current_key().to_string()
    }

    /// Latest-value subscription
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.publisher.subscribe()
    }

    /// Every transition, in order
    pub fn transitions(&self) -> broadcast::Receiver<PlaybackState> {
        self.publisher.transitions()
    }

    /// Apply a backend notification. Notifications from superseded
    /// sessions are dropped.
    pub(crate) fn apply(&self, event: SessionEvent) {
        let mut inner = self.inner.lock();
        let Some(active) = inner.session.clone() else {
            debug!("Ignoring {:?} from session {}: idle", event.event, event.session);
            return;
        };
        if active.id != event.session {
            debug!(
                "Ignoring stale {:?} from session {} (active {})",
                event.event, event.session, active.id
            );
            return;
        }

        match event.event {
            BackendEvent::Finished => {
                debug!("Session {} finished '{}'", active.id, active.key);
                inner.session = None;
                self.publisher.publish(PlaybackState::Idle);
            }
            BackendEvent::Failed(reason) if active.backend == Backend::Recorded => {
                warn!("Clip '{}' failed mid-playback ({}), falling back to speech", active.key, reason);
                self.clips.stop();
                let id = inner.next_session();
                let session = self.speak(id, active.key);
                self.install(&mut inner, session);
            }
            BackendEvent::Failed(reason) => {
                warn!("Speech for '{}' failed: {}", active.key, reason);
                inner.session = None;
                self.publisher.publish(PlaybackState::Idle);
            }
        }
    }

    /// Clear the session and publish idle, then tear down both backends
    fn halt(&self, inner: &mut Inner) {
        if let Some(session) = inner.session.take() {
            debug!("Stopping session {} '{}'", session.id, session.key);
        }
        self.publisher.publish(PlaybackState::Idle);
        self.clips.stop();
        self.speaker.stop();
    }

    fn install(&self, inner: &mut Inner, session: Option<ActiveSession>) {
        match session {
            Some(session) => {
                self.publisher.publish(session.state());
                inner.session = Some(session);
            }
            None => {
                inner.session = None;
                self.publisher.publish(PlaybackState::Idle);
            }
        }
    }

    /// Route to a recorded clip when one resolves and starts, else speech.
    /// Clip decode failures arrive later as `Failed` and fall back in `apply`.
    fn dispatch(&self, id: SessionId, key: String) -> Option<ActiveSession> {
        match self.resolver.resolve(&key) {
            Ok(resource) => match self.clips.start(&resource, self.notifier(id)) {
                Ok(()) => {
                    debug!("Session {}: playing clip {:?}", id, resource.path());
                    return Some(ActiveSession {
                        id,
                        key,
                        backend: Backend::Recorded,
                        paused: false,
                    });
                }
                Err(e) => {
                    warn!("Clip for '{}' unplayable ({}), falling back to speech", key, e);
                    self.clips.stop();
                }
            },
            Err(e) => debug!("Session {}: {}, synthesizing", id, e),
        }
        self.speak(id, key)
    }

    /// The key itself is the text uttered
    fn speak(&self, id: SessionId, key: String) -> Option<ActiveSession> {
        match self.speaker.speak(&key, self.notifier(id)) {
            Ok(()) => Some(ActiveSession {
                id,
                key,
                backend: Backend::Synthesized,
                paused: false,
            }),
            Err(e) => {
                info!("Could not play '{}': {}", key, e);
                None
            }
        }
    }

    fn notifier(&self, id: SessionId) -> Notifier {
        Notifier::new(id, self.events.clone())
    }
}
