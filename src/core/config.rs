/// Default chunk size: 64KB (same as PDF.js)
pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// Default maximum number of chunks to keep in memory cache
pub const DEFAULT_MAX_CACHED_CHUNKS: usize = 10;

/// Default upper bound on the length of a single token.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 4096;

/// Default limit on dictionary nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options controlling a single load.
///
/// `LoadOptions::default()` is what [`load`](crate::load) uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Longest token the cursor will accumulate before failing with
    /// `TokenTooLong`.
    pub max_token_len: usize,

    /// Deepest dictionary nesting accepted before failing with
    /// `NestingTooDeep`.
    pub max_depth: usize,

    /// Follow `/Prev` entries in the trailer and merge older xref sections.
    pub follow_prev: bool,

    /// Size of each chunk read from disk by [`FileStream`](super::file_stream::FileStream).
    pub chunk_size: usize,

    /// Maximum chunks kept in memory by [`FileStream`](super::file_stream::FileStream).
    pub max_cached_chunks: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            follow_prev: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_cached_chunks: DEFAULT_MAX_CACHED_CHUNKS,
        }
    }
}

impl LoadOptions {
    /// Sets the maximum token length.
    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = max_token_len;
        self
    }

    /// Sets the dictionary nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables following the `/Prev` chain.
    pub fn with_follow_prev(mut self, follow_prev: bool) -> Self {
        self.follow_prev = follow_prev;
        self
    }

    /// Sets the file chunk size and cache capacity.
    pub fn with_chunking(mut self, chunk_size: usize, max_cached_chunks: usize) -> Self {
        self.chunk_size = chunk_size;
        self.max_cached_chunks = max_cached_chunks;
        self
    }
}
