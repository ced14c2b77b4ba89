// Playback strategy seams used by the controller
use crate::error::Result;
use crate::library::AudioResource;

use super::events::Notifier;

/// Plays bundled clips. At most one clip is active; starting another
/// implicitly stops the previous one.
pub trait ClipPlayer: Send + Sync {
    /// Begin playing `resource` without blocking on file or device work.
    /// Open and decode failures arrive later through `notifier` as
    /// `Failed`; `Err` only means playback could not be started at all.
    fn start(&self, resource: &AudioResource, notifier: Notifier) -> Result<()>;

    /// Suspend without losing position
    fn pause(&self);

    fn resume(&self);

    /// Halt immediately and discard the clip. No notification follows.
    fn stop(&self);
}

/// Speaks text that has no recorded clip
pub trait Speaker: Send + Sync {
    /// Begin speaking `text`. `Err` means the engine could not start.
    fn speak(&self, text: &str, notifier: Notifier) -> Result<()>;

    /// Cancel speech best-effort and suppress the pending completion
    fn stop(&self);

    /// Synthesized speech cannot be paused; this is a no-op.
    fn pause(&self) {}

    /// No-op, see [`Speaker::pause`].
    fn resume(&self) {}
}
