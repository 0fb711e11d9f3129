use std::time::Duration;

use super::media_models::{CaptureMode, OutputFormat};

/// Configuration for a capture session.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfiguration {
    /// Quality tier id (e.g. "720p"). Unknown ids fall back to the default tier.
    pub tier_id: String,

    /// Requested output format (default: WebM).
    pub output_format: OutputFormat,

    /// Capture audio alongside the display (default: false).
    pub enable_audio: bool,

    /// Reduced-bandwidth capture: fixed low bitrate, scaled geometry.
    pub turbo: bool,

    /// Desktop mode merges a separately acquired microphone stream when
    /// audio is enabled. Mobile mode does not.
    pub mode: CaptureMode,

    /// Encoder data-emission cadence (default: 1 second).
    pub timeslice: Duration,

    /// How long `stop` waits for the encoder's stop confirmation before
    /// finalizing with what has arrived (default: 5 seconds).
    pub stop_confirmation_timeout: Duration,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.timeslice.is_zero() {
            return Err("timeslice must be positive".into());
        }
        if self.timeslice > Duration::from_secs(60) {
            return Err(format!("timeslice too long: {:?}", self.timeslice));
        }
        if self.stop_confirmation_timeout.is_zero() {
            return Err("stop confirmation timeout must be positive".into());
        }
        Ok(())
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            tier_id: crate::processing::resolution::DEFAULT_TIER_ID.to_string(),
            output_format: OutputFormat::WebM,
            enable_audio: false,
            turbo: false,
            mode: CaptureMode::Desktop,
            timeslice: Duration::from_secs(1),
            stop_confirmation_timeout: Duration::from_secs(5),
        }
    }
}
