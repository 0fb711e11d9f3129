use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::media_models::{MediaKind, OutputArtifact};
use crate::processing::resolution::QualityTier;

/// Result returned when a capture session stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub artifact: OutputArtifact,
    pub metadata: RecordingMetadata,
}

impl RecordingResult {
    /// Suggested download name, e.g. `recording_2026-10-19_14-03-27.webm`.
    pub fn suggested_file_name(&self) -> String {
        let stamp = chrono::DateTime::parse_from_rfc3339(&self.metadata.created_at)
            .map(|t| t.format("%Y-%m-%d_%H-%M-%S").to_string())
            .unwrap_or_else(|_| self.metadata.id.clone());
        format!("recording_{}.{}", stamp, self.artifact.extension())
    }
}

/// Metadata describing a finished recording.
///
/// Serializable for JSON hand-off to delivery collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub created_at: String,
    pub duration_secs: f64,
    pub tier_id: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub bitrate: u32,
    pub audio: bool,
    pub turbo: bool,
    pub kind: MediaKind,
    pub valid: bool,
    pub byte_length: u64,
    pub checksum: String,
}

impl RecordingMetadata {
    pub fn new(
        artifact: &OutputArtifact,
        tier: &QualityTier,
        bitrate: u32,
        duration_secs: f64,
        audio: bool,
        turbo: bool,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: created_at.to_rfc3339(),
            duration_secs,
            tier_id: tier.id.to_string(),
            width: tier.width,
            height: tier.height,
            frame_rate: tier.frame_rate,
            bitrate,
            audio,
            turbo,
            kind: artifact.kind,
            valid: artifact.valid,
            byte_length: artifact.bytes.len() as u64,
            checksum: sha256_hex(&artifact.bytes),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// SHA-256 hex digest of the delivered bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes).iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::resolution;
    use chrono::TimeZone;

    fn artifact() -> OutputArtifact {
        OutputArtifact {
            bytes: b"abc".to_vec(),
            kind: MediaKind::WebM,
            valid: true,
            degradations: Vec::new(),
        }
    }

    #[test]
    fn checksum_of_known_input() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn metadata_json_roundtrip() {
        let created = chrono::Utc.with_ymd_and_hms(2026, 10, 19, 14, 3, 27).unwrap();
        let tier = resolution::resolve("1080p");
        let meta = RecordingMetadata::new(&artifact(), tier, 5_000_000, 2.0, true, false, created);

        let json = meta.to_json().unwrap();
        let parsed: RecordingMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, meta);
        assert!(json.contains("\"video/webm\""));
        assert_eq!(meta.byte_length, 3);
    }

    #[test]
    fn file_name_uses_creation_time_and_extension() {
        let created = chrono::Utc.with_ymd_and_hms(2026, 10, 19, 14, 3, 27).unwrap();
        let tier = resolution::resolve("720p");
        let art = artifact();
        let metadata = RecordingMetadata::new(&art, tier, 2_500_000, 1.0, false, false, created);
        let result = RecordingResult { artifact: art, metadata };

        assert_eq!(result.suggested_file_name(), "recording_2026-10-19_14-03-27.webm");
    }
}
