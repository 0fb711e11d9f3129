use crate::models::error::CaptureError;
use crate::models::media_models::{TrackKind, VideoConstraints};

/// A single live capture track (display video, system or microphone audio).
pub trait MediaTrack: Send {
    fn kind(&self) -> TrackKind;

    fn label(&self) -> &str;

    /// Renegotiate the track's constraints while it is live.
    fn apply_constraints(&mut self, constraints: &VideoConstraints) -> Result<(), CaptureError>;

    /// Stop the track and release the underlying device. Must be idempotent.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// Interface for platform-specific display/audio acquisition.
///
/// Acquisition calls block until the platform (and usually the user, via a
/// consent prompt) responds. No timeout is applied by the core.
pub trait CaptureProvider: Send {
    /// Whether display capture is supported at all on this platform.
    fn is_available(&self) -> bool;

    /// Whether a separate microphone stream can be requested at all.
    fn is_microphone_available(&self) -> bool;

    /// Request a display stream. `audio` asks the platform to include its
    /// own audio track where supported.
    ///
    /// Errors: `CaptureDenied` when the user refuses, `CaptureUnavailable`
    /// for device errors.
    fn acquire_display(
        &mut self,
        constraints: &VideoConstraints,
        audio: bool,
    ) -> Result<MediaStream, CaptureError>;

    /// Request a separate microphone stream to merge into the display stream.
    fn acquire_microphone(&mut self) -> Result<MediaStream, CaptureError>;
}

/// An owned set of capture tracks.
#[derive(Default)]
pub struct MediaStream {
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl MediaStream {
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self { tracks }
    }

    /// Move every track of `other` into this stream.
    pub fn merge(&mut self, other: MediaStream) {
        self.tracks.extend(other.tracks);
    }

    pub fn video_tracks_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn MediaTrack>> {
        self.tracks.iter_mut().filter(|t| t.kind() == TrackKind::Video)
    }

    pub fn has_audio(&self) -> bool {
        self.tracks.iter().any(|t| t.kind() == TrackKind::Audio)
    }

    /// Stop every track. Safe to call more than once.
    pub fn stop_all(&mut self) {
        for track in self.tracks.iter_mut() {
            track.stop();
        }
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tracks.iter().map(|t| (t.kind(), t.label().to_string())))
            .finish()
    }
}
