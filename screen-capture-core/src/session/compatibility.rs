use serde::Serialize;

use crate::models::media_models::MediaKind;
use crate::traits::capture_provider::CaptureProvider;
use crate::traits::encoder::FormatSupport;

/// Platform capability summary, used by callers to decide whether to offer
/// recording at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompatibilityReport {
    pub display_capture: bool,
    /// Microphone acquisition supported. Not required for `overall`.
    pub audio_capture: bool,
    pub encoder: bool,
    pub webm: bool,
    pub mp4: bool,
    /// Display capture plus a WebM-capable encoder.
    pub overall: bool,
}

pub fn check_compatibility<P, S>(provider: &P, support: &S) -> CompatibilityReport
where
    P: CaptureProvider + ?Sized,
    S: FormatSupport + ?Sized,
{
    let display_capture = provider.is_available();
    let audio_capture = provider.is_microphone_available();
    let webm = support.is_type_supported(MediaKind::WebM.mime_type());
    let mp4 = support.is_type_supported(MediaKind::Mp4.mime_type());
    let encoder = webm || mp4 || support.is_type_supported(MediaKind::WebMVp9.mime_type());

    let report = CompatibilityReport {
        display_capture,
        audio_capture,
        encoder,
        webm,
        mp4,
        overall: display_capture && encoder && webm,
    };
    log::info!(
        "Compatibility: display={} audio={} encoder={} webm={} mp4={} overall={}",
        report.display_capture,
        report.audio_capture,
        report.encoder,
        report.webm,
        report.mp4,
        report.overall
    );
    report
}
