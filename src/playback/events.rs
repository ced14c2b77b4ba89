// Session-tagged backend notifications
use std::fmt;
use tokio::sync::mpsc;

/// Identity of one `play()` request. Monotonic per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    Finished,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub session: SessionId,
    pub event: BackendEvent,
}

/// Completion handle given to a backend for one session. Sends never block
/// and are dropped silently once the controller is gone.
#[derive(Debug, Clone)]
pub struct Notifier {
    session: SessionId,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl Notifier {
    pub fn new(session: SessionId, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { session, tx }
    }

    /// A notifier wired to a fresh channel, for driving backends directly
    pub fn channel(session: SessionId) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(session, tx), rx)
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn finished(&self) {
        self.send(BackendEvent::Finished);
    }

    pub fn failed(&self, reason: impl Into<String>) {
        self.send(BackendEvent::Failed(reason.into()));
    }

    fn send(&self, event: BackendEvent) {
        let _ = self.tx.send(SessionEvent {
            session: self.session,
            event,
        });
    }
}
