use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::models::error::CaptureError;

/// Interval between elapsed-time updates.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Periodic ticker running on its own thread.
///
/// Teardown is synchronous: `stop` wakes the thread through its shutdown
/// channel and joins it, so no tick fires after `stop` returns.
pub(crate) struct ElapsedClock {
    shutdown: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ElapsedClock {
    pub(crate) fn start<F>(tick: Duration, on_tick: F) -> Result<Self, CaptureError>
    where
        F: Fn() + Send + 'static,
    {
        let (shutdown, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("capture-clock".into())
            .spawn(move || loop {
                match shutdown_rx.recv_timeout(tick) {
                    Err(RecvTimeoutError::Timeout) => on_tick(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|e| CaptureError::EncodingFailed(format!("failed to spawn clock thread: {}", e)))?;

        Ok(Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }

    pub(crate) fn stop(&mut self) {
        // Dropping the sender disconnects the channel and wakes the thread.
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ElapsedClock {
    fn drop(&mut self) {
        self.stop();
    }
}
