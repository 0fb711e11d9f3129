//! Box-structured container inspection.
//!
//! Box layout (ISO base media file format):
//! ```text
//! [0-3]    size, big-endian u32, includes the 8-byte header
//! [4-7]    type, 4 ASCII bytes
//! [8-15]   largesize, big-endian u64, present only when size == 1
//! ```
//! Boxes follow each other contiguously. A recording is seekable only if a
//! `moov` box follows the leading `ftyp` box.

use crate::models::error::Degradation;
use crate::models::media_models::{MediaBlob, MediaKind};

/// Size of a compact box header in bytes.
pub const BOX_HEADER_SIZE: usize = 8;

/// Leading file-type box.
pub const FILE_TYPE_BOX: [u8; 4] = *b"ftyp";

/// Metadata box required for seeking.
pub const MOVIE_BOX: [u8; 4] = *b"moov";

/// A parsed box header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHeader {
    /// Total box size including the header. Zero means "to end of file".
    pub size: u64,
    pub box_type: [u8; 4],
}

impl BoxHeader {
    /// Read the header at `offset`. Returns `None` for truncated input.
    pub fn read(bytes: &[u8], offset: usize) -> Option<Self> {
        let header = bytes.get(offset..offset.checked_add(BOX_HEADER_SIZE)?)?;
        let compact = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let box_type = [header[4], header[5], header[6], header[7]];

        let size = if compact == 1 {
            let large_start = offset + BOX_HEADER_SIZE;
            let large = bytes.get(large_start..large_start.checked_add(8)?)?;
            let mut buf = [0u8; 8];
            buf.copy_from_slice(large);
            u64::from_be_bytes(buf)
        } else {
            compact as u64
        };

        Some(Self { size, box_type })
    }

    pub fn type_str(&self) -> String {
        String::from_utf8_lossy(&self.box_type).into_owned()
    }
}

/// Outcome of a box scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerScan {
    /// `ftyp` followed by `moov`.
    MetadataFound,
    /// `ftyp` present, no `moov` before the end, a zero-size box or a
    /// truncated header.
    MetadataMissing,
    /// The leading box is not `ftyp`.
    UnrecognizedHeader,
}

/// Walk the top-level boxes of `bytes` looking for the movie box.
pub fn scan(bytes: &[u8]) -> ContainerScan {
    let first = match BoxHeader::read(bytes, 0) {
        Some(h) if h.box_type == FILE_TYPE_BOX => h,
        _ => return ContainerScan::UnrecognizedHeader,
    };

    let mut offset = first.size;
    while offset < bytes.len() as u64 {
        let Some(header) = BoxHeader::read(bytes, offset as usize) else {
            break;
        };
        if header.box_type == MOVIE_BOX {
            return ContainerScan::MetadataFound;
        }
        if header.size == 0 {
            break;
        }
        offset = match offset.checked_add(header.size) {
            Some(next) => next,
            None => break,
        };
    }
    ContainerScan::MetadataMissing
}

/// Result of validating a finalized blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    /// The blob, possibly re-tagged. Bytes are never altered.
    pub blob: MediaBlob,
    pub degradation: Option<Degradation>,
}

/// Checks whether a finalized blob carries the metadata needed for seeking.
///
/// Must never fail: anything unparseable is reported as invalid.
pub trait ContainerValidator: Send + Sync {
    fn validate(&self, blob: MediaBlob) -> Validation;
}

/// Default validator for box-structured containers.
///
/// Blobs of other kinds carry no box layout and are passed as valid. A
/// missing `moov` box cannot be synthesized without re-multiplexing, so the
/// blob is only re-tagged with an explicit codec profile and flagged
/// degraded.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxStructureValidator;

impl ContainerValidator for BoxStructureValidator {
    fn validate(&self, blob: MediaBlob) -> Validation {
        if !blob.kind.is_box_structured() {
            return Validation { valid: true, blob, degradation: None };
        }

        match scan(&blob.bytes) {
            ContainerScan::MetadataFound => Validation { valid: true, blob, degradation: None },
            ContainerScan::UnrecognizedHeader => {
                let leading = BoxHeader::read(&blob.bytes, 0).map(|h| h.type_str());
                log::warn!(
                    "{} blob does not start with an ftyp box (leading {:?}, {} bytes)",
                    blob.kind,
                    leading,
                    blob.len()
                );
                Validation {
                    valid: false,
                    blob,
                    degradation: Some(Degradation::ContainerInvalid("leading ftyp box missing".into())),
                }
            }
            ContainerScan::MetadataMissing => {
                log::warn!("No moov box in {} byte {} blob, re-tagging", blob.len(), blob.kind);
                Validation {
                    valid: false,
                    blob: MediaBlob::new(blob.bytes, MediaKind::Mp4Avc),
                    degradation: Some(Degradation::ContainerInvalid("moov box not found".into())),
                }
            }
        }
    }
}
