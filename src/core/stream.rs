use super::base_stream::BaseStream;
use super::error::{PDFError, PDFResult};

/// A simple in-memory stream implementation.
///
/// Useful for testing and when the entire PDF is already in memory.
pub struct Stream {
    /// The underlying byte buffer
    bytes: Vec<u8>,
}

impl Stream {
    /// Creates a new Stream from a byte vector.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Stream { bytes }
    }
}

impl From<&[u8]> for Stream {
    fn from(bytes: &[u8]) -> Self {
        Stream::from_bytes(bytes.to_vec())
    }
}

impl BaseStream for Stream {
    fn length(&self) -> usize {
        self.bytes.len()
    }

    fn byte_at(&mut self, pos: usize) -> PDFResult<u8> {
        self.bytes
            .get(pos)
            .copied()
            .ok_or(PDFError::UnexpectedEndOfStream { offset: pos as i64 })
    }
}
