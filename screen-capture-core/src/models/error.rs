use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors returned by capture operations.
///
/// Every fatal path returns the session to `Idle` with all capture tracks
/// stopped and the chunk buffer cleared.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("capture denied by user")]
    CaptureDenied,

    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("a capture session is already active")]
    SessionBusy,

    #[error("no encoder could be constructed: {0}")]
    EncoderUnsupported(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}

impl CaptureError {
    /// Stable condition name used in `error:<condition>` status strings.
    pub fn condition(&self) -> &'static str {
        match self {
            Self::CaptureDenied => "CaptureDenied",
            Self::CaptureUnavailable(_) => "CaptureUnavailable",
            Self::SessionBusy => "SessionBusy",
            Self::EncoderUnsupported(_) => "EncoderUnsupported",
            Self::EncodingFailed(_) => "EncodingFailed",
            Self::ConfigurationFailed(_) => "ConfigurationFailed",
        }
    }
}

/// Non-fatal conditions. Reported and logged, never abort the operation.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "condition", content = "detail")]
pub enum Degradation {
    /// Microphone acquisition failed, recording continues video-only.
    #[error("audio unavailable, recording video only: {0}")]
    AudioDegraded(String),

    /// Turbo renegotiation failed, recording continues at original geometry.
    #[error("turbo constraints rejected, keeping original geometry: {0}")]
    QualityDegraded(String),

    /// The movie box was not found; the artifact is delivered anyway.
    #[error("container metadata missing: {0}")]
    ContainerInvalid(String),

    /// The requested kind could not be produced; original bytes delivered.
    #[error("cannot produce {requested}, delivering {delivered}")]
    ConversionUnavailable { requested: String, delivered: String },
}

impl Degradation {
    /// Stable condition name used in `degraded:<condition>` status strings.
    pub fn condition(&self) -> &'static str {
        match self {
            Self::AudioDegraded(_) => "AudioDegraded",
            Self::QualityDegraded(_) => "QualityDegraded",
            Self::ContainerInvalid(_) => "ContainerInvalid",
            Self::ConversionUnavailable { .. } => "ConversionUnavailable",
        }
    }
}

/// Lifecycle notification delivered to the status collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Acquiring,
    Recording,
    Stopped,
    Processing,
    Error(CaptureError),
    Degraded(Degradation),
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquiring => f.write_str("acquiring"),
            Self::Recording => f.write_str("recording"),
            Self::Stopped => f.write_str("stopped"),
            Self::Processing => f.write_str("processing"),
            Self::Error(e) => write!(f, "error:{}", e.condition()),
            Self::Degraded(d) => write!(f, "degraded:{}", d.condition()),
        }
    }
}
