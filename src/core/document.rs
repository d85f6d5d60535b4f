use super::base_stream::BaseStream;
use super::config::LoadOptions;
use super::cursor::{ByteCursor, Direction, ScanMode, Token};
use super::error::{PDFError, PDFResult};
use super::file_stream::FileStream;
use super::parser::{Dictionary, ObjectReference, PDFObject, parse_integer};
use super::stream::Stream;
use super::xref::{XRefEntry, XRefParser, XRefTable};
use rustc_hash::FxHashSet;
use std::fmt;
use std::path::Path;

/// Version declared in the `%PDF-1.x` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PdfVersion {
    minor: u8,
}

impl PdfVersion {
    pub fn major(&self) -> u8 {
        1
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1.{}", self.minor)
    }
}

/// The container structure of a PDF file.
///
/// This is what a load hands to higher-level document builders: the
/// declared version, the location of the newest xref section and the merged
/// cross-reference table with its trailer. The byte source used to read it
/// is not kept.
#[derive(Debug, Clone)]
pub struct PDFDocument {
    version: PdfVersion,
    xref_offset: u64,
    xref: XRefTable,
}

impl PDFDocument {
    /// Reads a PDF held in memory.
    ///
    /// # Example
    /// ```no_run
    /// use pdf_xref::PDFDocument;
    ///
    /// let pdf_data = std::fs::read("document.pdf").unwrap();
    /// let doc = PDFDocument::open(pdf_data).unwrap();
    /// println!("PDF {} with {} xref entries", doc.version(), doc.xref().len());
    /// ```
    pub fn open(data: Vec<u8>) -> PDFResult<Self> {
        Self::open_stream(Box::new(Stream::from_bytes(data)), &LoadOptions::default())
    }

    /// Reads a PDF file from disk with default options.
    pub fn open_file<P: AsRef<Path>>(path: P) -> PDFResult<Self> {
        Self::open_file_with_options(path, &LoadOptions::default())
    }

    /// Reads a PDF file from disk.
    ///
    /// The file handle is closed before this returns, on success and on
    /// every error path.
    pub fn open_file_with_options<P: AsRef<Path>>(
        path: P,
        options: &LoadOptions,
    ) -> PDFResult<Self> {
        let stream = FileStream::open(
            path,
            Some(options.chunk_size),
            Some(options.max_cached_chunks),
        )?;
        Self::open_stream(Box::new(stream), options)
    }

    /// Reads a PDF from any byte source.
    ///
    /// Steps: validate the header, scan backward from the end for `%%EOF`
    /// and the xref offset, parse the xref section there, then follow the
    /// `/Prev` chain if enabled.
    pub fn open_stream(stream: Box<dyn BaseStream>, options: &LoadOptions) -> PDFResult<Self> {
        let mut cursor = ByteCursor::new(stream).with_max_token_len(options.max_token_len);

        let version = Self::read_header(&mut cursor)?;
        log::debug!("PDF header declares version {}", version);

        let xref_offset = Self::find_startxref(&mut cursor)?;
        log::debug!("startxref points at offset {}", xref_offset);

        let mut xref = XRefParser::new(&mut cursor, xref_offset)
            .with_max_depth(options.max_depth)
            .parse()?;
        if options.follow_prev {
            Self::read_prev_chain(&mut cursor, xref_offset, options.max_depth, &mut xref)?;
        }

        Ok(PDFDocument {
            version,
            xref_offset,
            xref,
        })
    }

    /// Validates the `%PDF-1.[0-7]` header at the start of the file.
    fn read_header(cursor: &mut ByteCursor) -> PDFResult<PdfVersion> {
        if cursor.is_empty() {
            return Err(PDFError::MalformedHeader {
                found: String::new(),
            });
        }

        let token = match cursor.read_token(0, Direction::Forward, ScanMode::Sentinel) {
            Ok(token) => token,
            Err(PDFError::TokenTooLong { limit, .. }) => {
                return Err(PDFError::MalformedHeader {
                    found: format!("<token longer than {} bytes>", limit),
                });
            }
            Err(e) => return Err(e),
        };

        let bytes = token.as_bytes();
        if bytes.len() < 8 || !bytes.starts_with(b"%PDF-1.") {
            return Err(PDFError::MalformedHeader {
                found: token.text(),
            });
        }

        let minor = bytes[7];
        if !(b'0'..=b'7').contains(&minor) {
            return Err(PDFError::UnsupportedVersion {
                minor: minor as char,
            });
        }

        Ok(PdfVersion {
            minor: minor - b'0',
        })
    }

    /// Finds the byte offset of the cross-reference table.
    ///
    /// Scans backward from the last byte of the file:
    /// ```text
    /// ...
    /// startxref
    /// 12345
    /// %%EOF
    /// ```
    fn find_startxref(cursor: &mut ByteCursor) -> PDFResult<u64> {
        let last = cursor.len() as i64 - 1;
        let footer =
            Self::footer_token(cursor.read_token(last, Direction::Backward, ScanMode::Sentinel))?;
        if !footer.is("%%EOF") {
            return Err(PDFError::MalformedFooter {
                offset: footer.offset(),
                found: footer.text(),
            });
        }

        let digits = Self::read_backward(cursor, footer.offset())?;
        let xref_offset: u64 = parse_integer(&digits).map_err(|_| PDFError::MalformedFooter {
            offset: digits.offset(),
            found: digits.text(),
        })?;

        let keyword = Self::read_backward(cursor, digits.offset())?;
        if !keyword.is("startxref") {
            return Err(PDFError::MalformedFooter {
                offset: keyword.offset(),
                found: keyword.text(),
            });
        }

        if xref_offset >= cursor.len() {
            return Err(PDFError::BadXRefOffset {
                offset: xref_offset,
                found: String::new(),
            });
        }

        Ok(xref_offset)
    }

    fn read_backward(cursor: &mut ByteCursor, after: u64) -> PDFResult<Token> {
        if cursor.is_exhausted() {
            return Err(PDFError::MalformedFooter {
                offset: after,
                found: String::new(),
            });
        }
        Self::footer_token(cursor.read_token(
            cursor.position(),
            Direction::Backward,
            ScanMode::Token,
        ))
    }

    /// An overlong run at the end of the file is a bad footer, not a
    /// syntax error.
    fn footer_token(result: PDFResult<Token>) -> PDFResult<Token> {
        match result {
            Err(PDFError::TokenTooLong { offset, limit }) => Err(PDFError::MalformedFooter {
                offset,
                found: format!("<token longer than {} bytes>", limit),
            }),
            other => other,
        }
    }

    /// Follows `/Prev` links to older xref sections, merging each into
    /// `xref` with newer entries taking precedence.
    fn read_prev_chain(
        cursor: &mut ByteCursor,
        xref_offset: u64,
        max_depth: usize,
        xref: &mut XRefTable,
    ) -> PDFResult<()> {
        let mut visited = FxHashSet::default();
        visited.insert(xref_offset);

        let mut next = xref.prev()?;
        while let Some(prev) = next {
            if !visited.insert(prev) {
                return Err(PDFError::XRefLoop { offset: prev });
            }
            log::debug!("Following /Prev to xref section at offset {}", prev);

            let older = XRefParser::new(cursor, prev)
                .with_max_depth(max_depth)
                .parse()?;
            next = older.prev()?;
            xref.merge_older(older);
        }

        Ok(())
    }

    /// Returns the version declared in the header.
    pub fn version(&self) -> PdfVersion {
        self.version
    }

    /// Returns the offset of the newest xref section.
    pub fn xref_offset(&self) -> u64 {
        self.xref_offset
    }

    /// Returns the merged cross-reference table.
    pub fn xref(&self) -> &XRefTable {
        &self.xref
    }

    /// Consumes the document, returning its cross-reference table.
    pub fn into_xref(self) -> XRefTable {
        self.xref
    }

    /// Returns the trailer dictionary.
    pub fn trailer(&self) -> &Dictionary {
        self.xref.trailer()
    }

    /// Gets an entry from the xref table.
    pub fn entry(&self, obj_num: u32) -> Option<&XRefEntry> {
        self.xref.get_entry(obj_num)
    }

    /// Returns the `/Root` (catalog) reference from the trailer.
    pub fn root(&self) -> Option<ObjectReference> {
        self.trailer().get("Root").and_then(PDFObject::as_reference)
    }

    /// Returns `/Size` from the trailer.
    pub fn size(&self) -> Option<i64> {
        self.trailer().get("Size").and_then(PDFObject::as_integer)
    }

    /// Resolves a reference to the byte offset of its object.
    ///
    /// Returns `None` if the object is missing, free, or the generation
    /// number does not match.
    pub fn object_offset(&self, reference: ObjectReference) -> Option<u64> {
        self.entry(reference.obj_num)
            .filter(|e| e.in_use && e.generation == reference.generation_num)
            .map(|e| e.offset)
    }
}
