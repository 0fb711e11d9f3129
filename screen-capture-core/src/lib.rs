//! # screen-capture-core
//!
//! Platform-agnostic screen recording core library.
//!
//! Provides quality-tier policy, chunk buffering, container validation,
//! format export, and session orchestration. Platform backends implement
//! `CaptureProvider` (display/microphone acquisition) and `EncoderBackend`
//! (the streaming encoder) and plug into the generic `CaptureSession`.
//!
//! ## Architecture
//!
//! ```text
//! screen-capture-core (this crate)
//! ├── traits/       ← CaptureProvider, MediaTrack, EncoderBackend, MediaEncoder, CaptureDelegate, Transcoder
//! ├── models/       ← CaptureError, Degradation, StatusEvent, CaptureState, CaptureConfiguration, media types
//! ├── processing/   ← QualityTier policy, ChunkBuffer, MP4 box scan / ContainerValidator
//! ├── session/      ← CaptureSession (state machine), encoder negotiation, compatibility check
//! └── export/       ← ExportPipeline (format conversion + validation)
//! ```

pub mod export;
pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use export::pipeline::ExportPipeline;
pub use models::config::CaptureConfiguration;
pub use models::error::{CaptureError, Degradation, StatusEvent};
pub use models::media_models::{
    CaptureMode, EncodedChunk, MediaBlob, MediaKind, OutputArtifact, OutputFormat, TrackKind, VideoConstraints,
};
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use models::state::{format_elapsed, CaptureState};
pub use processing::chunk_buffer::ChunkBuffer;
pub use processing::container::{BoxStructureValidator, ContainerValidator, Validation};
pub use processing::resolution::QualityTier;
pub use session::capture::{CaptureSession, SessionToken};
pub use session::compatibility::{check_compatibility, CompatibilityReport};
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::capture_provider::{CaptureProvider, MediaStream, MediaTrack};
pub use traits::encoder::{
    EncoderBackend, EncoderEvent, EncoderEventSink, EncoderOptions, EncoderState, FormatSupport, MediaEncoder,
};
pub use traits::transcoder::Transcoder;
