use crate::models::error::CaptureError;
use crate::models::media_models::{MediaKind, OutputFormat};
use crate::traits::capture_provider::MediaStream;
use crate::traits::encoder::{EncoderBackend, EncoderOptions, MediaEncoder};

/// Encoder chosen for a recording and the kind it produces.
pub struct NegotiatedEncoder {
    pub encoder: Box<dyn MediaEncoder>,
    pub options: EncoderOptions,
    pub native_kind: MediaKind,
}

/// Construct an encoder for `format`.
///
/// Walks the format's candidate mime types in order, skipping those the
/// backend reports unsupported, then falls back to an unconstrained encoder.
/// Only when that also fails is `EncoderUnsupported` returned.
pub fn negotiate_encoder<B: EncoderBackend + ?Sized>(
    backend: &B,
    format: OutputFormat,
    bitrate: u32,
    stream: &MediaStream,
) -> Result<NegotiatedEncoder, CaptureError> {
    for candidate in format.encoder_candidates() {
        let mime = candidate.mime_type();
        if !backend.is_type_supported(mime) {
            log::debug!("Encoder does not support {}", mime);
            continue;
        }

        let options = EncoderOptions {
            mime_type: Some(mime.to_string()),
            video_bits_per_second: bitrate,
        };
        match backend.create(&options, stream) {
            Ok(encoder) => {
                log::info!("Encoder negotiated: {} at {} bps", mime, bitrate);
                let native_kind = native_kind_of(encoder.as_ref(), *candidate);
                return Ok(NegotiatedEncoder { encoder, options, native_kind });
            }
            Err(e) => log::warn!("Encoder construction failed for {}: {}", mime, e),
        }
    }

    let options = EncoderOptions {
        mime_type: None,
        video_bits_per_second: bitrate,
    };
    let encoder = backend.create(&options, stream).map_err(|e| {
        CaptureError::EncoderUnsupported(format!("no {} candidate and no default encoder: {}", format, e))
    })?;
    log::info!("Using platform default encoder ({})", encoder.mime_type());
    let native_kind = native_kind_of(encoder.as_ref(), MediaKind::WebM);
    Ok(NegotiatedEncoder { encoder, options, native_kind })
}

fn native_kind_of(encoder: &dyn MediaEncoder, fallback: MediaKind) -> MediaKind {
    let mime = encoder.mime_type();
    MediaKind::from_mime(&mime).unwrap_or_else(|| {
        log::debug!("Unrecognised encoder mime type {:?}, assuming {}", mime, fallback);
        fallback
    })
}
