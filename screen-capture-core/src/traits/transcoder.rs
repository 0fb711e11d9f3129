use crate::models::error::CaptureError;
use crate::models::media_models::{MediaBlob, OutputFormat};

/// Optional best-effort converter between recording formats.
///
/// The export pipeline passes the original bytes through when no
/// transcoder is configured or conversion fails.
pub trait Transcoder: Send + Sync {
    fn can_convert(&self, from: &MediaBlob, to: OutputFormat) -> bool;

    fn convert(&self, blob: &MediaBlob, to: OutputFormat) -> Result<MediaBlob, CaptureError>;
}
