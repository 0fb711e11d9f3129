use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crate::models::error::CaptureError;
use crate::traits::capture_provider::MediaStream;

/// Event produced by a running encoder, delivered in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A binary segment. May be empty; empty segments are dropped downstream.
    Data(Vec<u8>),
    /// A runtime error. The encoder may keep running.
    Error(String),
    /// Stop confirmation: no more data will follow.
    Stopped,
}

/// Sending half of the encoder's event channel.
pub type EncoderEventSink = Sender<EncoderEvent>;

/// Reported encoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    Inactive,
    Recording,
    Paused,
}

/// Options an encoder is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Requested mime type, or `None` to let the platform choose.
    pub mime_type: Option<String>,
    pub video_bits_per_second: u32,
}

/// Format-support query of the platform encoder.
pub trait FormatSupport: Send + Sync {
    fn is_type_supported(&self, mime_type: &str) -> bool;
}

/// A running (or startable) encoder bound to a capture stream.
pub trait MediaEncoder: Send {
    /// Start encoding, emitting a `Data` event every `timeslice`.
    fn start(&mut self, timeslice: Duration, sink: EncoderEventSink) -> Result<(), CaptureError>;

    /// Request stop. A `Stopped` event follows the last `Data` event.
    fn stop(&mut self) -> Result<(), CaptureError>;

    fn state(&self) -> EncoderState;

    /// Mime type the encoder actually produces.
    fn mime_type(&self) -> String;
}

/// Factory for platform encoders.
pub trait EncoderBackend: FormatSupport {
    /// Construct an encoder for `stream`. Fails when the requested mime
    /// type (or, for `None`, any encoder at all) cannot be provided.
    fn create(
        &self,
        options: &EncoderOptions,
        stream: &MediaStream,
    ) -> Result<Box<dyn MediaEncoder>, CaptureError>;
}

impl<T: FormatSupport + ?Sized> FormatSupport for Arc<T> {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        (**self).is_type_supported(mime_type)
    }
}

impl<T: EncoderBackend + ?Sized> EncoderBackend for Arc<T> {
    fn create(
        &self,
        options: &EncoderOptions,
        stream: &MediaStream,
    ) -> Result<Box<dyn MediaEncoder>, CaptureError> {
        (**self).create(options, stream)
    }
}
