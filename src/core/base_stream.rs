use super::error::PDFResult;

/// Base trait for the byte sources a [`ByteCursor`](super::cursor::ByteCursor)
/// reads from.
///
/// Reads are random access by absolute offset. The cursor keeps its own
/// position, so sources carry none.
pub trait BaseStream {
    /// Returns the total length of the stream in bytes.
    fn length(&self) -> usize;

    /// Returns true if the stream contains no data.
    fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Reads the byte at `pos`.
    ///
    /// Fails with `UnexpectedEndOfStream` when `pos >= length()`.
    fn byte_at(&mut self, pos: usize) -> PDFResult<u8>;
}
