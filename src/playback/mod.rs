// Playback module
// Session controller, backend seams and observable state

pub mod backend;
pub mod controller;
pub mod events;
pub mod request;
pub mod state;

pub use backend::{ClipPlayer, Speaker};
pub use controller::PlaybackController;
pub use events::{BackendEvent, Notifier, SessionEvent, SessionId};
pub use request::PlaybackRequest;
pub use state::{PlaybackState, StatePublisher};
