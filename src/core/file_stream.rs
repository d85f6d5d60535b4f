use super::base_stream::BaseStream;
use super::config::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CACHED_CHUNKS};
use super::error::{PDFError, PDFResult};
use lru::LruCache;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// A stream that reads a filesystem file in fixed-size chunks.
///
/// The cursor reads one byte at a time, often walking backward from the end
/// of the file. Chunks are loaded on demand and kept in an LRU cache so those
/// reads do not each hit the OS.
///
/// The file handle is owned by the stream and closed when it is dropped.
pub struct FileStream {
    /// File handle for reading chunks
    file: File,
    /// Path to the file (stored for reference)
    file_path: PathBuf,
    /// Recently used chunks (chunk number -> data)
    chunks: LruCache<usize, Vec<u8>>,
    /// Total number of chunks ever read from disk
    chunks_read: usize,
    chunk_size: usize,
    total_length: usize,
}

impl FileStream {
    /// Opens a file for chunked reading.
    ///
    /// # Arguments
    /// * `path` - Path to the PDF file
    /// * `chunk_size` - Size of each chunk (default: 64KB)
    /// * `max_cached_chunks` - Maximum chunks to keep in memory (default: 10)
    pub fn open<P: AsRef<Path>>(
        path: P,
        chunk_size: Option<usize>,
        max_cached_chunks: Option<usize>,
    ) -> PDFResult<Self> {
        let file_path = path.as_ref().to_path_buf();
        let mut file = File::open(&file_path)?;
        let total_length = file.seek(SeekFrom::End(0))? as usize;

        let chunk_size = chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE).max(1);
        let capacity = NonZeroUsize::new(max_cached_chunks.unwrap_or(DEFAULT_MAX_CACHED_CHUNKS))
            .unwrap_or(NonZeroUsize::MIN);

        log::debug!(
            "Opened {} ({} bytes, chunk size {})",
            file_path.display(),
            total_length,
            chunk_size
        );

        Ok(FileStream {
            file,
            file_path,
            chunks: LruCache::new(capacity),
            chunks_read: 0,
            chunk_size,
            total_length,
        })
    }

    /// Returns the path this stream was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the number of chunks read from disk so far, including
    /// re-reads of evicted chunks.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }

    /// Returns the number of chunks currently held in the cache.
    pub fn num_chunks_cached(&self) -> usize {
        self.chunks.len()
    }

    fn request_chunk(&mut self, chunk_num: usize) -> PDFResult<Vec<u8>> {
        let chunk_start = chunk_num * self.chunk_size;
        let chunk_end = std::cmp::min(chunk_start + self.chunk_size, self.total_length);

        self.file.seek(SeekFrom::Start(chunk_start as u64))?;
        let mut buffer = vec![0u8; chunk_end - chunk_start];
        self.file.read_exact(&mut buffer)?;

        self.chunks_read += 1;
        Ok(buffer)
    }
}

impl BaseStream for FileStream {
    fn length(&self) -> usize {
        self.total_length
    }

    fn byte_at(&mut self, pos: usize) -> PDFResult<u8> {
        if pos >= self.total_length {
            return Err(PDFError::UnexpectedEndOfStream { offset: pos as i64 });
        }

        let chunk_num = pos / self.chunk_size;
        if !self.chunks.contains(&chunk_num) {
            let data = self.request_chunk(chunk_num)?;
            self.chunks.put(chunk_num, data);
        }

        let chunk = self
            .chunks
            .get(&chunk_num)
            .ok_or(PDFError::UnexpectedEndOfStream { offset: pos as i64 })?;
        Ok(chunk[pos - chunk_num * self.chunk_size])
    }
}
