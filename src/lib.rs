//! # pdf-xref: PDF container reader
//!
//! Reads the container structure of a PDF file: the header version, the
//! classic cross-reference table, the trailer dictionary and the low-level
//! objects (names, numbers, indirect references, dictionaries) needed to
//! locate every object in the file.
//!
//! ```no_run
//! let doc = pdf_xref::load("document.pdf")?;
//!
//! println!("PDF {}", doc.version());
//! if let Some(root) = doc.root() {
//!     println!("catalog {} at offset {:?}", root, doc.object_offset(root));
//! }
//! for entry in &doc.xref().entries {
//!     println!("{:>6} {:>10} {:>5} {}", entry.obj_num, entry.offset, entry.generation,
//!         if entry.in_use { 'n' } else { 'f' });
//! }
//! # Ok::<(), pdf_xref::PDFError>(())
//! ```
//!
//! ## Architecture
//!
//! 1. **Byte sources**: [`Stream`] (memory) and [`FileStream`] (disk, chunked)
//! 2. **Cursor**: [`ByteCursor`] scans tokens forward or backward
//! 3. **Parsers**: [`Parser`] for objects, [`XRefParser`] for the xref table
//! 4. **Loader**: [`PDFDocument`] ties them together
//!
//! Cross-reference streams, object streams, arrays and strings are not
//! supported and are reported as errors rather than misread.

pub mod core;

pub use crate::core::{
    BaseStream, ByteCursor, Dictionary, ErrorClass, FileStream, LoadOptions, ObjectReference,
    PDFDocument, PDFError, PDFObject, PDFResult, Parser, PdfVersion, Stream, Token, XRefEntry,
    XRefParser, XRefTable,
};

use std::path::Path;

/// Loads the container structure of the PDF file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> PDFResult<PDFDocument> {
    PDFDocument::open_file(path)
}

/// Loads the PDF file at `path` with explicit options.
pub fn load_with_options<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> PDFResult<PDFDocument> {
    PDFDocument::open_file_with_options(path, options)
}
