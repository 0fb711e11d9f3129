use std::time::Duration;

use crate::models::error::StatusEvent;
use crate::models::state::CaptureState;

/// Event delegate for capture session notifications.
///
/// `on_elapsed` is called from the clock thread and `on_status` may be
/// called from the chunk collector thread. Implementations should marshal
/// to a UI thread if needed.
pub trait CaptureDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &CaptureState);

    /// Lifecycle notification (`acquiring`, `recording`, `error:<..>`, ...).
    fn on_status(&self, event: &StatusEvent);

    /// Called once per second while recording.
    fn on_elapsed(&self, elapsed: Duration);
}
