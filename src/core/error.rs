use thiserror::Error;

/// Broad category of a [`PDFError`].
///
/// Every error is terminal for the load that produced it; the class only
/// tells the caller whether the bytes could not be read, the file is not a
/// PDF this reader accepts, or the structure inside it did not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Open, read or seek failures.
    Io,
    /// Bad header, bad footer or bad xref placement.
    Format,
    /// Malformed or unsupported syntax inside the file.
    Parse,
}

/// Universal error type for PDF loading.
///
/// Variants carry the byte offset where the problem was found and, where
/// one exists, the token text that was read instead of what was expected.
#[derive(Debug, Error)]
pub enum PDFError {
    /// Underlying read failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A read started outside the byte source
    #[error("Unexpected end of stream at offset {offset}")]
    UnexpectedEndOfStream { offset: i64 },

    #[error("Malformed PDF header: found {found:?}")]
    MalformedHeader { found: String },

    #[error("PDF version 1.{minor} is not supported by this reader")]
    UnsupportedVersion { minor: char },

    #[error("Malformed PDF footer at offset {offset}: found {found:?}")]
    MalformedFooter { offset: u64, found: String },

    /// The xref offset does not point at an `xref` keyword
    #[error("Bad xref offset {offset}: found {found:?}")]
    BadXRefOffset { offset: u64, found: String },

    /// A `/Prev` chain revisits an xref section
    #[error("Cross-reference chain loops back to offset {offset}")]
    XRefLoop { offset: u64 },

    /// `/Prev` is present but is not a non-negative integer
    #[error("Trailer /Prev is not a valid xref offset: found {found}")]
    InvalidPrev { found: String },

    #[error("Malformed number at offset {offset}: {found:?}")]
    MalformedNumber { offset: u64, found: String },

    #[error("Expected {expected} at offset {offset}, found {found:?}")]
    UnexpectedToken {
        offset: u64,
        expected: &'static str,
        found: String,
    },

    /// Arrays, strings, booleans, null and streams are not modeled
    #[error("Unsupported object syntax at offset {offset}: {found:?}")]
    UnsupportedObjectSyntax { offset: u64, found: String },

    #[error("Dictionary starting at offset {offset} is missing its closing '>>'")]
    UnterminatedDictionary { offset: u64 },

    /// Cross-reference streams (PDF 1.5+) are not supported
    #[error("Unsupported cross-reference format at offset {offset}: found object {found:?}")]
    UnsupportedXRefFormat { offset: u64, found: String },

    #[error("Cross-reference section at offset {offset} has no trailer dictionary")]
    MissingTrailer { offset: u64 },

    #[error("Unexpected end of data while looking for {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("Token at offset {offset} exceeds {limit} bytes")]
    TokenTooLong { offset: u64, limit: usize },

    #[error("Dictionary at offset {offset} is nested more than {limit} levels deep")]
    NestingTooDeep { offset: u64, limit: usize },
}

impl PDFError {
    /// Returns the category this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            PDFError::Io(_)
            | PDFError::UnexpectedEndOfStream { .. } => ErrorClass::Io,

            PDFError::MalformedHeader { .. }
            | PDFError::UnsupportedVersion { .. }
            | PDFError::MalformedFooter { .. }
            | PDFError::BadXRefOffset { .. }
            | PDFError::XRefLoop { .. }
            | PDFError::InvalidPrev { .. } => ErrorClass::Format,

            PDFError::MalformedNumber { .. }
            | PDFError::UnexpectedToken { .. }
            | PDFError::UnsupportedObjectSyntax { .. }
            | PDFError::UnterminatedDictionary { .. }
            | PDFError::UnsupportedXRefFormat { .. }
            | PDFError::MissingTrailer { .. }
            | PDFError::UnexpectedEof { .. }
            | PDFError::TokenTooLong { .. }
            | PDFError::NestingTooDeep { .. } => ErrorClass::Parse,
        }
    }
}

/// Result type alias for PDF operations
pub type PDFResult<T> = Result<T, PDFError>;
