//! Byte classification per the PDF lexical rules.

/// The lexical class of a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    Whitespace,
    Delimiter,
    Regular,
}

/// Checks if a byte is whitespace as defined by ISO 32000-1, 7.2.2.
///
/// PDF whitespace: NUL, TAB, LF, FF, CR, SPACE
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, 0x00 | 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

/// Checks if a byte is a delimiter as defined by ISO 32000-1, 7.2.2.
///
/// PDF delimiters: ( ) < > [ ] { } / %
pub fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Checks if a byte is neither whitespace nor a delimiter.
pub fn is_regular(b: u8) -> bool {
    classify(b) == ByteClass::Regular
}

/// Returns the class of `b`.
pub fn classify(b: u8) -> ByteClass {
    if is_whitespace(b) {
        ByteClass::Whitespace
    } else if is_delimiter(b) {
        ByteClass::Delimiter
    } else {
        ByteClass::Regular
    }
}
