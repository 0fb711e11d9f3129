use std::sync::Arc;
use std::time::Duration;

use crate::models::error::{CaptureError, Degradation, StatusEvent};
use crate::models::state::CaptureState;
use crate::traits::capture_delegate::CaptureDelegate;

/// Logs every lifecycle notification and forwards it to the delegate, if any.
#[derive(Clone, Default)]
pub(crate) struct Notifier {
    delegate: Option<Arc<dyn CaptureDelegate>>,
}

impl Notifier {
    pub(crate) fn new(delegate: Option<Arc<dyn CaptureDelegate>>) -> Self {
        Self { delegate }
    }

    pub(crate) fn state(&self, state: &CaptureState) {
        log::debug!("Capture state -> {}", state.name());
        if let Some(ref d) = self.delegate {
            d.on_state_changed(state);
        }
    }

    pub(crate) fn status(&self, event: StatusEvent) {
        match &event {
            StatusEvent::Error(e) => log::error!("Capture error: {}", e),
            StatusEvent::Degraded(d) => log::warn!("Capture degraded: {}", d),
            other => log::info!("Capture status: {}", other),
        }
        if let Some(ref d) = self.delegate {
            d.on_status(&event);
        }
    }

    pub(crate) fn error(&self, error: CaptureError) {
        self.status(StatusEvent::Error(error));
    }

    pub(crate) fn degraded(&self, degradation: Degradation) {
        self.status(StatusEvent::Degraded(degradation));
    }

    pub(crate) fn elapsed(&self, elapsed: Duration) {
        if let Some(ref d) = self.delegate {
            d.on_elapsed(elapsed);
        }
    }
}
