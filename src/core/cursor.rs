use super::base_stream::BaseStream;
use super::classifier::{ByteClass, classify};
use super::config::DEFAULT_MAX_TOKEN_LEN;
use super::error::{PDFError, PDFResult};
use smallvec::SmallVec;
use std::fmt;

/// Direction a [`ByteCursor`] steps through the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// How a scan treats delimiter bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// A delimiter ends a token once accumulation has started. Brackets and
    /// parentheses are tokens of their own; `/` and `%` lead the regular
    /// bytes after them.
    Token,
    /// Only whitespace ends a token. Used for the `%PDF-1.x` header and
    /// the `%%EOF` footer, which contain delimiter bytes themselves.
    Sentinel,
}

/// A run of bytes produced by one scan.
///
/// Either a maximal run of non-whitespace bytes up to (not including) the
/// next delimiter, a single bracket or parenthesis, or a name or comment
/// led by `/` or `%`. Bytes are always in file order, also for backward
/// scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    bytes: SmallVec<[u8; 16]>,
    offset: u64,
}

impl Token {
    /// Returns the raw bytes of the token.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Offset of the token's first byte in the source.
    ///
    /// For an empty token this is where the scan stopped.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the scan hit the end of the source before finding a byte.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Returns true if the token is exactly `keyword`.
    pub fn is(&self, keyword: &str) -> bool {
        self.bytes.as_slice() == keyword.as_bytes()
    }

    /// Returns true if the token's first byte is a PDF delimiter.
    pub fn starts_with_delimiter(&self) -> bool {
        self.first()
            .is_some_and(|b| classify(b) == ByteClass::Delimiter)
    }

    /// Token text with invalid UTF-8 replaced, for messages and names.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Delimiters that always form a one-byte token.
fn stands_alone(byte: u8) -> bool {
    classify(byte) == ByteClass::Delimiter && byte != b'/' && byte != b'%'
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

/// Saved cursor state, used to undo a lookahead.
#[derive(Debug, Clone)]
pub struct CursorState {
    pos: i64,
    token: Token,
}

/// Scanner over a byte source that produces one [`Token`] per call.
///
/// The cursor owns the source and the read position. Each call to
/// [`read_token`](Self::read_token) leaves the position at the first byte it
/// did not consume, so the next call continues from there in either
/// direction. A backward scan that runs off the start of the source leaves
/// the position at `-1`.
pub struct ByteCursor {
    /// The input stream
    stream: Box<dyn BaseStream>,

    /// Next offset to read; may sit one step outside the source
    pos: i64,

    /// Most recently scanned token
    token: Token,

    max_token_len: usize,
}

impl ByteCursor {
    /// Creates a cursor at offset 0 of `stream`.
    pub fn new(stream: Box<dyn BaseStream>) -> Self {
        ByteCursor {
            stream,
            pos: 0,
            token: Token::default(),
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }

    /// Sets the longest token the cursor will accumulate.
    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = max_token_len;
        self
    }

    /// Current read position.
    pub fn position(&self) -> i64 {
        self.pos
    }

    /// Length of the underlying source in bytes.
    pub fn len(&self) -> u64 {
        self.stream.length() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// The most recently scanned token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// True when the position lies outside the source, so any further read
    /// from it fails.
    pub fn is_exhausted(&self) -> bool {
        !self.in_bounds(self.pos)
    }

    fn in_bounds(&self, pos: i64) -> bool {
        pos >= 0 && (pos as u64) < self.len()
    }

    /// Scans one token starting at `offset`.
    ///
    /// Leading whitespace is skipped. Reaching either end of the source ends
    /// the token with whatever was accumulated, which may be nothing. A scan
    /// that starts outside the source fails with `UnexpectedEndOfStream`.
    pub fn read_token(
        &mut self,
        offset: i64,
        direction: Direction,
        mode: ScanMode,
    ) -> PDFResult<Token> {
        if !self.in_bounds(offset) {
            return Err(PDFError::UnexpectedEndOfStream { offset });
        }

        let step = direction.step();
        let mut bytes: SmallVec<[u8; 16]> = SmallVec::new();
        let mut first_pos = offset;
        let mut last_pos = offset;
        self.pos = offset;

        while self.in_bounds(self.pos) {
            let byte = self.stream.byte_at(self.pos as usize)?;
            let class = classify(byte);

            if mode == ScanMode::Token && class == ByteClass::Delimiter && !bytes.is_empty() {
                break;
            }

            self.pos += step;

            if class == ByteClass::Whitespace {
                if bytes.is_empty() {
                    continue;
                }
                break;
            }

            if bytes.is_empty() {
                first_pos = self.pos - step;
            }
            if bytes.len() >= self.max_token_len {
                return Err(PDFError::TokenTooLong {
                    offset: first_pos.max(0) as u64,
                    limit: self.max_token_len,
                });
            }
            last_pos = self.pos - step;
            bytes.push(byte);

            if mode == ScanMode::Token && bytes.len() == 1 && stands_alone(byte) {
                break;
            }
        }

        let token_offset = if bytes.is_empty() {
            self.pos.clamp(0, self.len() as i64) as u64
        } else {
            match direction {
                Direction::Forward => first_pos as u64,
                Direction::Backward => {
                    bytes.reverse();
                    last_pos as u64
                }
            }
        };

        let token = Token {
            bytes,
            offset: token_offset,
        };
        log::trace!("token {:?} at {}", token.text(), token.offset);
        self.token = token.clone();
        Ok(token)
    }

    /// Reads the next token forward from the current position.
    pub fn next_token(&mut self) -> PDFResult<Token> {
        self.read_token(self.pos, Direction::Forward, ScanMode::Token)
    }

    /// Returns the next forward token without consuming it.
    ///
    /// Position and last token are restored on every path, so calling
    /// `peek` has no effect on later reads.
    pub fn peek(&mut self) -> PDFResult<Token> {
        let saved = self.snapshot();
        let result = self.next_token();
        self.restore(saved);
        result
    }

    /// Captures the position and last token.
    pub fn snapshot(&self) -> CursorState {
        CursorState {
            pos: self.pos,
            token: self.token.clone(),
        }
    }

    /// Returns the cursor to a previously captured state.
    pub fn restore(&mut self, state: CursorState) {
        self.pos = state.pos;
        self.token = state.token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stream::Stream;

    fn cursor(data: &[u8]) -> ByteCursor {
        ByteCursor::new(Box::new(Stream::from(data)))
    }

    fn texts(cursor: &mut ByteCursor) -> Vec<String> {
        let mut out = Vec::new();
        while !cursor.is_exhausted() {
            let token = cursor.next_token().unwrap();
            if token.is_empty() {
                break;
            }
            out.push(token.text());
        }
        out
    }

    #[test]
    fn test_tokenize_object_header() {
        let mut c = cursor(b"12 0 obj");
        assert_eq!(texts(&mut c), vec!["12", "0", "obj"]);
    }

    #[test]
    fn test_leading_whitespace_skipped() {
        let mut c = cursor(b" \t\r\n\x0c\x00 xref");
        let token = c.next_token().unwrap();
        assert_eq!(token.as_bytes(), b"xref");
        assert_eq!(token.offset(), 7);
    }

    #[test]
    fn test_delimiters_split_tokens() {
        let mut c = cursor(b"<</Type/Catalog/Pages 3 0 R>>");
        assert_eq!(
            texts(&mut c),
            vec!["<", "<", "/Type", "/Catalog", "/Pages", "3", "0", "R", ">", ">"]
        );
    }

    #[test]
    fn test_brackets_do_not_absorb_following_bytes() {
        let mut c = cursor(b">>startxref\n[0(a)");
        assert_eq!(
            texts(&mut c),
            vec![">", ">", "startxref", "[", "0", "(", "a", ")"]
        );

        let mut c = cursor(b"/Type%comment");
        assert_eq!(texts(&mut c), vec!["/Type", "%comment"]);
    }

    #[test]
    fn test_backward_bracket_stands_alone() {
        let data = b"<< >>\n123";
        let mut c = cursor(data);
        let digits = c
            .read_token(data.len() as i64 - 1, Direction::Backward, ScanMode::Token)
            .unwrap();
        assert!(digits.is("123"));

        let close = c
            .read_token(c.position(), Direction::Backward, ScanMode::Token)
            .unwrap();
        assert!(close.is(">"));
        assert_eq!(close.offset(), 4);
    }

    #[test]
    fn test_delimiter_left_unconsumed() {
        let mut c = cursor(b"37/Next");
        assert!(c.next_token().unwrap().is("37"));
        assert_eq!(c.position(), 2);
        assert!(c.next_token().unwrap().is("/Next"));
    }

    #[test]
    fn test_whitespace_terminator_consumed() {
        let mut c = cursor(b"ab cd");
        c.next_token().unwrap();
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn test_sentinel_mode_keeps_delimiters() {
        let mut c = cursor(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n");
        let token = c.read_token(0, Direction::Forward, ScanMode::Sentinel).unwrap();
        assert!(token.is("%PDF-1.7"));

        let mut c = cursor(b"%PDF-1.7\n");
        let token = c.read_token(0, Direction::Forward, ScanMode::Token).unwrap();
        assert!(token.is("%PDF-1.7"));
    }

    #[test]
    fn test_backward_scan_returns_file_order() {
        let data = b"startxref\n1234\n%%EOF\n";
        let mut c = cursor(data);

        let footer = c
            .read_token(data.len() as i64 - 1, Direction::Backward, ScanMode::Sentinel)
            .unwrap();
        assert!(footer.is("%%EOF"));
        assert_eq!(footer.offset(), 15);

        let offset = c
            .read_token(c.position(), Direction::Backward, ScanMode::Token)
            .unwrap();
        assert!(offset.is("1234"));
        assert_eq!(offset.offset(), 10);

        let keyword = c
            .read_token(c.position(), Direction::Backward, ScanMode::Token)
            .unwrap();
        assert!(keyword.is("startxref"));
        assert_eq!(keyword.offset(), 0);
        assert_eq!(c.position(), -1);
        assert!(c.is_exhausted());
    }

    #[test]
    fn test_end_of_stream_ends_token() {
        let mut c = cursor(b"42");
        assert!(c.next_token().unwrap().is("42"));
        assert!(c.is_exhausted());
        assert!(matches!(
            c.next_token(),
            Err(PDFError::UnexpectedEndOfStream { offset: 2 })
        ));
    }

    #[test]
    fn test_trailing_whitespace_gives_empty_token() {
        let mut c = cursor(b"42   ");
        c.next_token().unwrap();
        let token = c.next_token().unwrap();
        assert!(token.is_empty());
        assert_eq!(token.offset(), 5);
        assert!(c.next_token().is_err());
    }

    #[test]
    fn test_peek_has_no_effect() {
        let mut c = cursor(b"1 0 R /Next");
        c.next_token().unwrap();
        let before = (c.position(), c.token().clone());

        let peeked = c.peek().unwrap();
        assert!(peeked.is("0"));
        assert_eq!((c.position(), c.token().clone()), before);

        assert!(c.next_token().unwrap().is("0"));
    }

    #[test]
    fn test_peek_restores_on_error() {
        let mut c = cursor(b"7");
        c.next_token().unwrap();
        let pos = c.position();
        assert!(c.peek().is_err());
        assert_eq!(c.position(), pos);
        assert!(c.token().is("7"));
    }

    #[test]
    fn test_token_too_long() {
        let mut c = cursor(b"abcdefgh").with_max_token_len(4);
        assert!(matches!(
            c.next_token(),
            Err(PDFError::TokenTooLong { offset: 0, limit: 4 })
        ));
    }

    #[test]
    fn test_start_outside_source() {
        let mut c = cursor(b"abc");
        assert!(c.read_token(3, Direction::Forward, ScanMode::Token).is_err());
        assert!(c.read_token(-1, Direction::Backward, ScanMode::Token).is_err());
    }
}
