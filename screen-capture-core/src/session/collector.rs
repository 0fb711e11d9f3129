use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::error::CaptureError;
use crate::models::media_models::EncodedChunk;
use crate::processing::chunk_buffer::ChunkBuffer;
use crate::session::notifier::Notifier;
use crate::traits::encoder::EncoderEvent;

/// How often the collector re-checks its drain deadline while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Sole consumer of an encoder's event channel.
///
/// Appends `Data` events to the shared buffer strictly in arrival order and
/// exits on the stop confirmation, on channel disconnect, or once a drain
/// deadline set by `drain` has passed.
pub(crate) struct ChunkCollector {
    drain_deadline: Arc<Mutex<Option<Instant>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ChunkCollector {
    pub(crate) fn spawn(
        events: Receiver<EncoderEvent>,
        buffer: Arc<Mutex<ChunkBuffer>>,
        notifier: Notifier,
    ) -> Result<Self, CaptureError> {
        let drain_deadline = Arc::new(Mutex::new(None::<Instant>));
        let deadline = Arc::clone(&drain_deadline);

        let handle = thread::Builder::new()
            .name("chunk-collector".into())
            .spawn(move || loop {
                match events.recv_timeout(POLL_INTERVAL) {
                    Ok(EncoderEvent::Data(data)) => {
                        buffer.lock().append(EncodedChunk::new(data));
                    }
                    Ok(EncoderEvent::Error(message)) => {
                        notifier.error(CaptureError::EncodingFailed(message));
                    }
                    Ok(EncoderEvent::Stopped) => {
                        log::debug!("Encoder confirmed stop");
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        let expired = matches!(*deadline.lock(), Some(d) if Instant::now() >= d);
                        if expired {
                            log::warn!("Encoder stop confirmation timed out, finalizing received chunks");
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        log::debug!("Encoder event channel closed");
                        break;
                    }
                }
            })
            .map_err(|e| CaptureError::EncodingFailed(format!("failed to spawn collector thread: {}", e)))?;

        Ok(Self {
            drain_deadline,
            handle: Some(handle),
        })
    }

    /// Wait for the collector to finish, giving the encoder at most
    /// `timeout` to confirm. Events arriving afterwards are discarded.
    pub(crate) fn drain(&mut self, timeout: Duration) {
        *self.drain_deadline.lock() = Some(Instant::now() + timeout);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ChunkCollector {
    fn drop(&mut self) {
        self.drain(Duration::ZERO);
    }
}
