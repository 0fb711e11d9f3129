use crate::models::media_models::{EncodedChunk, MediaBlob, MediaKind};

/// Ordered, append-only store of encoder output for one recording.
///
/// Wrap in `Arc<parking_lot::Mutex<ChunkBuffer>>` for the collector thread.
/// Chunks are only accepted between `open` and `finalize`; finalization
/// concatenates in arrival order, then clears and closes the buffer, so a
/// buffer is never finalized twice over the same chunks.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<EncodedChunk>,
    next_sequence: u64,
    byte_len: usize,
    accepting: bool,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting chunks for a new recording.
    pub fn open(&mut self) {
        self.clear();
        self.accepting = true;
    }

    /// Append a chunk. Returns whether it was stored.
    ///
    /// Zero-length chunks carry no data and are dropped, as is anything
    /// arriving while the buffer is closed.
    pub fn append(&mut self, mut chunk: EncodedChunk) -> bool {
        if !self.accepting {
            log::warn!("Dropping {} byte chunk: buffer not open", chunk.len());
            return false;
        }
        if chunk.is_empty() {
            return false;
        }

        chunk.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.byte_len += chunk.len();
        self.chunks.push(chunk);
        true
    }

    /// Concatenate all chunks in arrival order into one blob tagged `kind`,
    /// then clear and close the buffer.
    ///
    /// An empty buffer yields a zero-length blob.
    pub fn finalize(&mut self, kind: MediaKind) -> MediaBlob {
        let mut bytes = Vec::with_capacity(self.byte_len);
        for chunk in self.chunks.drain(..) {
            bytes.extend_from_slice(&chunk.data);
        }
        self.close();
        MediaBlob::new(bytes, kind)
    }

    /// Discard everything and stop accepting chunks.
    pub fn close(&mut self) {
        self.clear();
        self.accepting = false;
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Total stored bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Release every stored chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.next_sequence = 0;
        self.byte_len = 0;
    }
}
