pub mod base_stream;
pub mod classifier;
pub mod config;
pub mod cursor;
pub mod document;
pub mod error;
pub mod file_stream;
pub mod parser;
pub mod stream;
pub mod xref;

pub use base_stream::BaseStream;
pub use classifier::{ByteClass, classify, is_delimiter, is_whitespace};
pub use config::LoadOptions;
pub use cursor::{ByteCursor, CursorState, Direction, ScanMode, Token};
pub use document::{PDFDocument, PdfVersion};
pub use error::{ErrorClass, PDFError, PDFResult};
pub use file_stream::FileStream;
pub use parser::{Dictionary, ObjectReference, PDFObject, Parser};
pub use stream::Stream;
pub use xref::{XRefEntry, XRefParser, XRefSubsection, XRefTable};
