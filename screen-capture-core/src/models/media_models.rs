use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::Degradation;

/// Output format family requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    WebM,
    Mp4,
    Gif,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::WebM => "webm",
            Self::Mp4 => "mp4",
            Self::Gif => "gif",
        }
    }

    /// Encoder mime types to try, in order, when recording for this format.
    ///
    /// GIF is never produced by an encoder directly, so it records WebM and
    /// leaves conversion to the export step.
    pub fn encoder_candidates(&self) -> &'static [MediaKind] {
        match self {
            Self::WebM => &[MediaKind::WebMVp9, MediaKind::WebM],
            Self::Mp4 => &[MediaKind::Mp4],
            Self::Gif => &[MediaKind::WebM],
        }
    }

    /// Kind a blob is declared as when delivered in this format.
    pub fn canonical_kind(&self) -> MediaKind {
        match self {
            Self::WebM => MediaKind::WebM,
            Self::Mp4 => MediaKind::Mp4,
            Self::Gif => MediaKind::Gif,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webm" => Ok(Self::WebM),
            "mp4" => Ok(Self::Mp4),
            "gif" => Ok(Self::Gif),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Declared media kind (container and codec profile) of a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "video/webm")]
    WebM,
    #[serde(rename = "video/webm;codecs=vp9")]
    WebMVp9,
    #[serde(rename = "video/mp4")]
    Mp4,
    /// MP4 re-tagged with an explicit baseline H.264 + AAC-LC profile.
    #[serde(rename = "video/mp4; codecs=\"avc1.42E01E, mp4a.40.2\"")]
    Mp4Avc,
    #[serde(rename = "image/gif")]
    Gif,
}

impl MediaKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::WebM => "video/webm",
            Self::WebMVp9 => "video/webm;codecs=vp9",
            Self::Mp4 => "video/mp4",
            Self::Mp4Avc => "video/mp4; codecs=\"avc1.42E01E, mp4a.40.2\"",
            Self::Gif => "image/gif",
        }
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            Self::WebM | Self::WebMVp9 => OutputFormat::WebM,
            Self::Mp4 | Self::Mp4Avc => OutputFormat::Mp4,
            Self::Gif => OutputFormat::Gif,
        }
    }

    /// Whether the kind uses the length-prefixed box container layout.
    pub fn is_box_structured(&self) -> bool {
        self.format() == OutputFormat::Mp4
    }

    /// Parse a mime type as reported by an encoder.
    ///
    /// Matching is on the container part and an optional vp9 codec hint;
    /// anything unrecognised yields `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        let (container, params) = match mime.split_once(';') {
            Some((c, p)) => (c.trim(), p.trim()),
            None => (mime.as_str(), ""),
        };
        match container {
            "video/webm" if params.contains("vp9") => Some(Self::WebMVp9),
            "video/webm" => Some(Self::WebM),
            "video/mp4" if params.contains("avc1") => Some(Self::Mp4Avc),
            "video/mp4" => Some(Self::Mp4),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Track type within a capture stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// Capture entry point. Mobile capture relies on the display stream's own
/// audio and never requests a separate microphone stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Desktop,
    Mobile,
}

/// Ideal (negotiable) capture constraints. The device may not honour them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub ideal_frame_rate: f64,
}

/// One binary segment emitted by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedChunk {
    /// Arrival position, assigned by the chunk buffer.
    pub sequence: u64,
    pub data: Vec<u8>,
}

impl EncodedChunk {
    pub fn new(data: Vec<u8>) -> Self {
        Self { sequence: 0, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Finalized, contiguous recording bytes plus their declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub bytes: Vec<u8>,
    pub kind: MediaKind,
}

impl MediaBlob {
    pub fn new(bytes: Vec<u8>, kind: MediaKind) -> Self {
        Self { bytes, kind }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Delivery-ready recording.
///
/// Owned by whoever receives it; the core keeps no reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub bytes: Vec<u8>,
    pub kind: MediaKind,
    /// Set by the container validator.
    pub valid: bool,
    /// Non-fatal conditions raised while producing this artifact.
    pub degradations: Vec<Degradation>,
}

impl OutputArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension matching the declared kind.
    pub fn extension(&self) -> &'static str {
        self.kind.format().extension()
    }
}
