use super::config::DEFAULT_MAX_DEPTH;
use super::cursor::{ByteCursor, Token};
use super::error::{PDFError, PDFResult};
use rustc_hash::FxHashMap;
use std::fmt;

/// Dictionary keyed by name (without the leading `/`).
pub type Dictionary = FxHashMap<String, PDFObject>;

/// Indirect object reference (like "5 0 R").
///
/// Identity only; resolved later against the cross-reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    pub obj_num: u32,
    pub generation_num: u32,
}

impl ObjectReference {
    pub fn new(obj_num: u32, generation_num: u32) -> Self {
        ObjectReference {
            obj_num,
            generation_num,
        }
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.obj_num, self.generation_num)
    }
}

/// PDF object types understood by this reader.
///
/// Arrays, strings, booleans, null and streams are not modeled; the parser
/// rejects them with `UnsupportedObjectSyntax` instead of guessing.
#[derive(Debug, Clone, PartialEq)]
pub enum PDFObject {
    /// Name value (from /Name), without the slash
    Name(String),

    Integer(i64),

    Real(f64),

    /// Indirect object reference (like "5 0 R")
    Ref(ObjectReference),

    /// Dictionary (key-value pairs)
    Dictionary(Dictionary),
}

impl PDFObject {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PDFObject::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PDFObject::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PDFObject::Integer(n) => Some(*n as f64),
            PDFObject::Real(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjectReference> {
        match self {
            PDFObject::Ref(reference) => Some(*reference),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            PDFObject::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

/// Parses a run of ASCII digits, reporting `MalformedNumber` with the
/// token's offset on failure.
pub(crate) fn parse_integer<T: std::str::FromStr>(token: &Token) -> PDFResult<T> {
    std::str::from_utf8(token.as_bytes())
        .ok()
        .filter(|text| !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| PDFError::MalformedNumber {
            offset: token.offset(),
            found: token.text(),
        })
}

fn parse_real(token: &Token) -> PDFResult<f64> {
    std::str::from_utf8(token.as_bytes())
        .ok()
        .filter(|text| text.bytes().all(|b| b.is_ascii_digit() || b == b'.'))
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| PDFError::MalformedNumber {
            offset: token.offset(),
            found: token.text(),
        })
}

/// Recursive parser for the PDF object grammar.
///
/// Works directly on a borrowed [`ByteCursor`]: every method starts reading
/// at the cursor's position and leaves the cursor just past the value it
/// produced.
///
/// Dictionaries nested deeper than `max_depth` fail with `NestingTooDeep`.
pub struct Parser<'c> {
    cursor: &'c mut ByteCursor,
    max_depth: usize,
}

impl<'c> Parser<'c> {
    pub fn new(cursor: &'c mut ByteCursor) -> Self {
        Parser {
            cursor,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the deepest dictionary nesting accepted.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the next PDF object.
    ///
    /// - Names: /Type
    /// - Integers and reals: 37, 3.14
    /// - Indirect references: 12 0 R
    /// - Dictionaries: << /Key1 value1 /Key2 value2 ... >>
    pub fn parse_object(&mut self) -> PDFResult<PDFObject> {
        let token = self.cursor.next_token()?;
        self.parse_object_from(token, 0)
    }

    /// Parses a dictionary: << /Key1 value1 /Key2 value2 ... >>
    pub fn parse_dictionary(&mut self) -> PDFResult<Dictionary> {
        let open = self.cursor.next_token()?;
        if !open.is("<") {
            return Err(PDFError::UnexpectedToken {
                offset: open.offset(),
                expected: "<<",
                found: open.text(),
            });
        }
        self.parse_dictionary_body(open.offset(), 1)
    }

    /// Parses a value whose first token has been read. `depth` is the
    /// number of dictionaries enclosing it.
    fn parse_object_from(&mut self, token: Token, depth: usize) -> PDFResult<PDFObject> {
        match token.first() {
            Some(b'/') => Ok(PDFObject::Name(
                String::from_utf8_lossy(&token.as_bytes()[1..]).into_owned(),
            )),

            Some(b'0'..=b'9') => self.parse_number_or_reference(token),

            Some(b'<') if token.len() == 1 => {
                let next = self.peek_if_available()?;
                if next.as_ref().is_some_and(|t| t.is("<")) {
                    Ok(PDFObject::Dictionary(
                        self.parse_dictionary_body(token.offset(), depth + 1)?,
                    ))
                } else {
                    // Hex string
                    Err(PDFError::UnsupportedObjectSyntax {
                        offset: token.offset(),
                        found: token.text(),
                    })
                }
            }

            None => Err(PDFError::UnexpectedEof {
                expected: "object",
            }),

            _ => Err(PDFError::UnsupportedObjectSyntax {
                offset: token.offset(),
                found: token.text(),
            }),
        }
    }

    /// Distinguishes `37`, `3.14` and `12 0 R`.
    ///
    /// A number followed by a delimiter (or by the end of the data) is a
    /// scalar. Otherwise it must be the object number of a reference, with
    /// the generation number and the `R` keyword following.
    fn parse_number_or_reference(&mut self, token: Token) -> PDFResult<PDFObject> {
        let next = self.peek_if_available()?;
        let is_scalar = match &next {
            None => true,
            Some(next) => next.is_empty() || next.starts_with_delimiter(),
        };

        if is_scalar {
            if token.as_bytes().contains(&b'.') {
                return Ok(PDFObject::Real(parse_real(&token)?));
            }
            return Ok(PDFObject::Integer(parse_integer(&token)?));
        }

        let obj_num = parse_integer(&token)?;
        let generation = self.cursor.next_token()?;
        let generation_num = parse_integer(&generation)?;

        let keyword = self.cursor.next_token()?;
        if !keyword.is("R") {
            return Err(PDFError::UnexpectedToken {
                offset: keyword.offset(),
                expected: "R",
                found: keyword.text(),
            });
        }

        Ok(PDFObject::Ref(ObjectReference::new(obj_num, generation_num)))
    }

    /// Reads a dictionary whose first `<` has already been consumed.
    fn parse_dictionary_body(&mut self, start: u64, depth: usize) -> PDFResult<Dictionary> {
        if depth > self.max_depth {
            return Err(PDFError::NestingTooDeep {
                offset: start,
                limit: self.max_depth,
            });
        }

        let open = self.cursor.next_token()?;
        if !open.is("<") {
            return Err(PDFError::UnexpectedToken {
                offset: open.offset(),
                expected: "<<",
                found: open.text(),
            });
        }

        let mut dict = Dictionary::default();

        loop {
            let token = self.next_in_dictionary(start)?;

            if token.is(">") {
                let close = self.next_in_dictionary(start)?;
                if !close.is(">") {
                    return Err(PDFError::UnexpectedToken {
                        offset: close.offset(),
                        expected: ">>",
                        found: close.text(),
                    });
                }
                return Ok(dict);
            }

            let key = match token.first() {
                Some(b'/') => String::from_utf8_lossy(&token.as_bytes()[1..]).into_owned(),
                _ => {
                    return Err(PDFError::UnexpectedToken {
                        offset: token.offset(),
                        expected: "name or '>>'",
                        found: token.text(),
                    });
                }
            };

            if self.cursor.is_exhausted() {
                return Err(PDFError::UnterminatedDictionary { offset: start });
            }
            let value_token = self.cursor.next_token()?;
            let value = self.parse_object_from(value_token, depth)?;

            if dict.insert(key.clone(), value).is_some() {
                log::debug!("Duplicate dictionary key /{} at offset {}", key, token.offset());
            }
        }
    }

    /// Next token inside a dictionary; running out of data is reported as an
    /// unterminated dictionary rather than a bare end-of-stream.
    fn next_in_dictionary(&mut self, start: u64) -> PDFResult<Token> {
        if self.cursor.is_exhausted() {
            return Err(PDFError::UnterminatedDictionary { offset: start });
        }
        let token = self.cursor.next_token()?;
        if token.is_empty() {
            return Err(PDFError::UnterminatedDictionary { offset: start });
        }
        Ok(token)
    }

    fn peek_if_available(&mut self) -> PDFResult<Option<Token>> {
        if self.cursor.is_exhausted() {
            return Ok(None);
        }
        self.cursor.peek().map(Some)
    }
}
