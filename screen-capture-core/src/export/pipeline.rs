use std::sync::Arc;

use crate::models::error::Degradation;
use crate::models::media_models::{MediaBlob, OutputArtifact, OutputFormat};
use crate::processing::container::{BoxStructureValidator, ContainerValidator};
use crate::traits::encoder::FormatSupport;
use crate::traits::transcoder::Transcoder;

/// Turns a finalized blob into a delivery-ready artifact.
///
/// Flow:
/// ```text
/// requested == native ─────────────────────────┐
/// encoder supports requested ── relabel ───────┤
/// transcoder can convert ────── convert ───────┼→ [ContainerValidator] → artifact
/// otherwise ─────────────────── pass through ──┘   (+ ConversionUnavailable)
/// ```
/// The validator runs exactly once per call, and the same input always
/// yields the same artifact.
#[derive(Clone)]
pub struct ExportPipeline {
    support: Arc<dyn FormatSupport>,
    validator: Arc<dyn ContainerValidator>,
    transcoder: Option<Arc<dyn Transcoder>>,
}

impl ExportPipeline {
    pub fn new(support: Arc<dyn FormatSupport>) -> Self {
        Self {
            support,
            validator: Arc::new(BoxStructureValidator),
            transcoder: None,
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn ContainerValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    /// Produce an artifact of `requested` format from `blob`.
    ///
    /// Never fails. When the requested format cannot be produced the
    /// original bytes are delivered with a `ConversionUnavailable`
    /// degradation.
    pub fn process(&self, blob: MediaBlob, requested: OutputFormat) -> OutputArtifact {
        let mut degradations = Vec::new();
        let converted = self.convert(blob, requested, &mut degradations);

        let validation = self.validator.validate(converted);
        degradations.extend(validation.degradation);

        OutputArtifact {
            bytes: validation.blob.bytes,
            kind: validation.blob.kind,
            valid: validation.valid,
            degradations,
        }
    }

    fn convert(
        &self,
        blob: MediaBlob,
        requested: OutputFormat,
        degradations: &mut Vec<Degradation>,
    ) -> MediaBlob {
        if blob.kind.format() == requested {
            return blob;
        }

        // Only kinds an encoder emits directly are relabelled; GIF never is.
        let target = requested.canonical_kind();
        let encodable = requested.encoder_candidates().contains(&target);
        if encodable && self.support.is_type_supported(target.mime_type()) {
            log::debug!("{} natively supported, relabelling {} bytes", target, blob.len());
            return MediaBlob::new(blob.bytes, target);
        }

        if let Some(transcoder) = self.transcoder.as_ref().filter(|t| t.can_convert(&blob, requested)) {
            match transcoder.convert(&blob, requested) {
                Ok(converted) => return converted,
                Err(e) => log::warn!("Conversion {} -> {} failed: {}", blob.kind, requested, e),
            }
        }

        log::warn!("Cannot produce {}, delivering original {}", target, blob.kind);
        degradations.push(Degradation::ConversionUnavailable {
            requested: target.mime_type().to_string(),
            delivered: blob.kind.mime_type().to_string(),
        });
        blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::error::CaptureError;
    use crate::models::media_models::MediaKind;
    use crate::processing::container::Validation;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Supports(&'static [&'static str]);

    impl FormatSupport for Supports {
        fn is_type_supported(&self, mime_type: &str) -> bool {
            self.0.contains(&mime_type)
        }
    }

    #[derive(Default)]
    struct CountingValidator {
        calls: AtomicUsize,
    }

    impl ContainerValidator for CountingValidator {
        fn validate(&self, blob: MediaBlob) -> Validation {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BoxStructureValidator.validate(blob)
        }
    }

    struct ReversingTranscoder {
        fail: bool,
    }

    impl Transcoder for ReversingTranscoder {
        fn can_convert(&self, from: &MediaBlob, to: OutputFormat) -> bool {
            from.kind.format() == OutputFormat::WebM && to == OutputFormat::Gif
        }

        fn convert(&self, blob: &MediaBlob, to: OutputFormat) -> Result<MediaBlob, CaptureError> {
            if self.fail {
                return Err(CaptureError::EncodingFailed("decoder missing".into()));
            }
            let mut bytes = blob.bytes.clone();
            bytes.reverse();
            Ok(MediaBlob::new(bytes, to.canonical_kind()))
        }
    }

    fn mp4_with_moov() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&16u32.to_be_bytes());
        bytes.extend_from_slice(b"ftypisom");
        bytes.extend_from_slice(&[0; 4]);
        bytes.extend_from_slice(&8u32.to_be_bytes());
        bytes.extend_from_slice(b"moov");
        bytes
    }

    fn pipeline(supported: &'static [&'static str]) -> ExportPipeline {
        ExportPipeline::new(Arc::new(Supports(supported)))
    }

    #[test]
    fn native_kind_is_validated_and_kept() {
        let artifact = pipeline(&[]).process(MediaBlob::new(mp4_with_moov(), MediaKind::Mp4), OutputFormat::Mp4);
        assert!(artifact.valid);
        assert_eq!(artifact.kind, MediaKind::Mp4);
        assert_eq!(artifact.bytes, mp4_with_moov());
        assert!(artifact.degradations.is_empty());
    }

    #[test]
    fn codec_variant_counts_as_native() {
        let blob = MediaBlob::new(b"webm-bytes".to_vec(), MediaKind::WebMVp9);
        let artifact = pipeline(&[]).process(blob, OutputFormat::WebM);
        assert_eq!(artifact.kind, MediaKind::WebMVp9);
        assert!(artifact.degradations.is_empty());
    }

    #[test]
    fn natively_supported_target_reuses_bytes() {
        let blob = MediaBlob::new(mp4_with_moov(), MediaKind::WebM);
        let artifact = pipeline(&["video/mp4"]).process(blob, OutputFormat::Mp4);
        assert_eq!(artifact.kind, MediaKind::Mp4);
        assert_eq!(artifact.bytes, mp4_with_moov());
        assert!(artifact.valid);
    }

    #[test]
    fn unsupported_target_passes_original_through() {
        let blob = MediaBlob::new(b"webm-bytes".to_vec(), MediaKind::WebM);
        let artifact = pipeline(&["video/webm"]).process(blob, OutputFormat::Gif);

        assert_eq!(artifact.bytes, b"webm-bytes".to_vec());
        assert_eq!(artifact.kind, MediaKind::WebM);
        assert!(artifact.valid);
        assert_eq!(
            artifact.degradations,
            vec![Degradation::ConversionUnavailable {
                requested: "image/gif".into(),
                delivered: "video/webm".into(),
            }]
        );
    }

    #[test]
    fn gif_support_never_relabels_webm_bytes() {
        let blob = MediaBlob::new(b"webm-bytes".to_vec(), MediaKind::WebM);
        let artifact = pipeline(&["video/webm", "image/gif"]).process(blob, OutputFormat::Gif);

        assert_eq!(artifact.kind, MediaKind::WebM);
        assert_eq!(artifact.bytes, b"webm-bytes".to_vec());
        assert_eq!(
            artifact.degradations,
            vec![Degradation::ConversionUnavailable {
                requested: "image/gif".into(),
                delivered: "video/webm".into(),
            }]
        );
    }

    #[test]
    fn transcoder_used_when_available() {
        let p = pipeline(&[]).with_transcoder(Arc::new(ReversingTranscoder { fail: false }));
        let artifact = p.process(MediaBlob::new(vec![1, 2, 3], MediaKind::WebM), OutputFormat::Gif);
        assert_eq!(artifact.kind, MediaKind::Gif);
        assert_eq!(artifact.bytes, vec![3, 2, 1]);
        assert!(artifact.degradations.is_empty());
    }

    #[test]
    fn failed_transcode_degrades_to_original() {
        let p = pipeline(&[]).with_transcoder(Arc::new(ReversingTranscoder { fail: true }));
        let artifact = p.process(MediaBlob::new(vec![1, 2, 3], MediaKind::WebM), OutputFormat::Gif);
        assert_eq!(artifact.kind, MediaKind::WebM);
        assert_eq!(artifact.bytes, vec![1, 2, 3]);
        assert_eq!(artifact.degradations[0].condition(), "ConversionUnavailable");
    }

    #[test]
    fn relabelled_foreign_bytes_are_flagged_invalid() {
        let blob = MediaBlob::new(b"\x1aE\xdf\xa3webm".to_vec(), MediaKind::WebM);
        let artifact = pipeline(&["video/mp4"]).process(blob, OutputFormat::Mp4);
        assert!(!artifact.valid);
        // leading box is not ftyp: returned unmodified, kind stays as relabelled
        assert_eq!(artifact.kind, MediaKind::Mp4);
        assert_eq!(artifact.degradations.len(), 1);
    }

    #[test]
    fn validator_runs_once_per_process() {
        let validator = Arc::new(CountingValidator::default());
        let p = pipeline(&[]).with_validator(validator.clone());

        p.process(MediaBlob::new(vec![9; 4], MediaKind::WebM), OutputFormat::Gif);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 1);
        p.process(MediaBlob::new(mp4_with_moov(), MediaKind::Mp4), OutputFormat::Mp4);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn processing_is_idempotent() {
        let p = pipeline(&["video/webm"]);
        let mut truncated = mp4_with_moov();
        truncated.truncate(16);

        for (bytes, kind, format) in [
            (mp4_with_moov(), MediaKind::Mp4, OutputFormat::Mp4),
            (truncated, MediaKind::Mp4, OutputFormat::Mp4),
            (b"abc".to_vec(), MediaKind::WebM, OutputFormat::Gif),
        ] {
            let blob = MediaBlob::new(bytes, kind);
            let first = p.process(blob.clone(), format);
            let second = p.process(blob, format);
            assert_eq!(first.bytes, second.bytes);
            assert_eq!(first.valid, second.valid);
            assert_eq!(first.kind, second.kind);
        }
    }
}
