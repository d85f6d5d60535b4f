use super::config::DEFAULT_MAX_DEPTH;
use super::cursor::{ByteCursor, Direction, ScanMode, Token};
use super::error::{PDFError, PDFResult};
use super::parser::{Dictionary, Parser, parse_integer};
use rustc_hash::FxHashSet;

/// Cross-reference table entry.
///
/// For a free entry (`in_use == false`) the offset field holds the number of
/// the next free object; it is stored as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefEntry {
    pub obj_num: u32,
    pub offset: u64,
    pub generation: u32,
    pub in_use: bool,
}

impl XRefEntry {
    /// Returns true if this entry is free.
    pub fn is_free(&self) -> bool {
        !self.in_use
    }
}

/// One `start count` header of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefSubsection {
    pub start: u32,
    pub count: u32,
}

/// Cross-reference table for a PDF document.
///
/// Entries from every subsection are kept in one flat sequence in the order
/// they were read. `obj_start` and `obj_end` are the two numbers of the most
/// recent subsection header; `subsections` keeps all of them.
///
/// Example xref table format:
/// ```text
/// xref
/// 0 6
/// 0000000000 65535 f
/// 0000000015 00000 n
/// 0000000079 00000 n
/// 0000000173 00000 n
/// 0000000301 00000 n
/// 0000000380 00000 n
/// trailer
/// << /Size 6 /Root 1 0 R >>
/// startxref
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XRefTable {
    pub obj_start: u32,
    pub obj_end: u32,
    pub entries: Vec<XRefEntry>,
    pub subsections: Vec<XRefSubsection>,
    pub trailer: Dictionary,
}

impl XRefTable {
    /// Gets the entry for `obj_num`. If the number appears more than once,
    /// the entry read last wins.
    pub fn get_entry(&self, obj_num: u32) -> Option<&XRefEntry> {
        self.entries.iter().rev().find(|e| e.obj_num == obj_num)
    }

    /// Returns the trailer dictionary.
    pub fn trailer(&self) -> &Dictionary {
        &self.trailer
    }

    /// Offset of the previous cross-reference section, from `/Prev`.
    ///
    /// A `/Prev` that is present but not a non-negative integer fails with
    /// `InvalidPrev`.
    pub fn prev(&self) -> PDFResult<Option<u64>> {
        let Some(prev) = self.trailer.get("Prev") else {
            return Ok(None);
        };
        prev.as_integer()
            .and_then(|n| u64::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| PDFError::InvalidPrev {
                found: format!("{:?}", prev),
            })
    }

    /// Merges a table from an earlier revision of the file into this one.
    ///
    /// Entries already present here take precedence; the older table only
    /// contributes object numbers this one does not mention. Trailer keys
    /// missing here are filled in from the older trailer.
    pub fn merge_older(&mut self, older: XRefTable) {
        let known: FxHashSet<u32> = self.entries.iter().map(|e| e.obj_num).collect();
        self.entries
            .extend(older.entries.into_iter().filter(|e| !known.contains(&e.obj_num)));
        self.subsections.extend(older.subsections);

        for (key, value) in older.trailer {
            self.trailer.entry(key).or_insert(value);
        }
    }

    /// Returns the number of entries in the xref table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the xref table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Position of the xref parser within the table grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum XRefState {
    ObjStart,
    ObjEnd,
    ObjTabCol1,
    ObjTabCol2,
    ObjTabCol3,
    Trailer,
}

/// State machine that reads one classic `xref` ... `startxref` section.
pub struct XRefParser<'c> {
    cursor: &'c mut ByteCursor,
    xref_offset: u64,
    max_depth: usize,
}

impl<'c> XRefParser<'c> {
    /// Creates a parser for the section whose `xref` keyword is at
    /// `xref_offset`.
    pub fn new(cursor: &'c mut ByteCursor, xref_offset: u64) -> Self {
        XRefParser {
            cursor,
            xref_offset,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the nesting limit for the trailer dictionary.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reads the table and trailer, stopping at `startxref`.
    ///
    /// A `trailer` keyword switches to the trailer from any state, so a
    /// subsection with fewer rows than announced is tolerated.
    pub fn parse(mut self) -> PDFResult<XRefTable> {
        if self.xref_offset >= self.cursor.len() {
            return Err(PDFError::BadXRefOffset {
                offset: self.xref_offset,
                found: String::new(),
            });
        }

        let keyword = self.cursor.read_token(
            self.xref_offset as i64,
            Direction::Forward,
            ScanMode::Token,
        )?;
        if !keyword.is("xref") {
            return Err(self.bad_offset(keyword));
        }

        let mut table = XRefTable::default();
        let mut state = XRefState::ObjStart;
        let mut has_trailer = false;
        let mut next_obj_num = 0u32;
        let mut remaining = 0u32;
        let mut offset = 0u64;
        let mut generation = 0u32;

        loop {
            if self.cursor.is_exhausted() {
                return Err(PDFError::UnexpectedEof {
                    expected: "startxref",
                });
            }
            let token = self.cursor.next_token()?;
            if token.is_empty() {
                return Err(PDFError::UnexpectedEof {
                    expected: "startxref",
                });
            }

            if token.is("startxref") {
                if !has_trailer {
                    return Err(PDFError::MissingTrailer {
                        offset: self.xref_offset,
                    });
                }
                log::debug!(
                    "Read xref section at {}: {} entries in {} subsections",
                    self.xref_offset,
                    table.entries.len(),
                    table.subsections.len()
                );
                return Ok(table);
            }

            if token.is("trailer") {
                if remaining > 0 && state != XRefState::Trailer {
                    log::warn!(
                        "xref subsection starting at object {} ends {} entries early",
                        table.obj_start,
                        remaining
                    );
                    remaining = 0;
                }
                state = XRefState::Trailer;
                table.trailer = Parser::new(&mut *self.cursor)
                    .with_max_depth(self.max_depth)
                    .parse_dictionary()?;
                has_trailer = true;
                continue;
            }

            match state {
                XRefState::ObjStart => {
                    table.obj_start = parse_integer(&token)?;
                    next_obj_num = table.obj_start;
                    state = XRefState::ObjEnd;
                }
                XRefState::ObjEnd => {
                    table.obj_end = parse_integer(&token)?;
                    let fits = table.obj_end == 0
                        || table.obj_start.checked_add(table.obj_end - 1).is_some();
                    if !fits {
                        return Err(PDFError::MalformedNumber {
                            offset: token.offset(),
                            found: token.text(),
                        });
                    }
                    table.subsections.push(XRefSubsection {
                        start: table.obj_start,
                        count: table.obj_end,
                    });
                    remaining = table.obj_end;
                    state = if remaining == 0 {
                        XRefState::ObjStart
                    } else {
                        XRefState::ObjTabCol1
                    };
                }
                XRefState::ObjTabCol1 => {
                    offset = parse_integer(&token)?;
                    state = XRefState::ObjTabCol2;
                }
                XRefState::ObjTabCol2 => {
                    generation = parse_integer(&token)?;
                    state = XRefState::ObjTabCol3;
                }
                XRefState::ObjTabCol3 => {
                    let in_use = if token.is("n") {
                        true
                    } else if token.is("f") {
                        false
                    } else {
                        return Err(PDFError::UnexpectedToken {
                            offset: token.offset(),
                            expected: "'f' or 'n'",
                            found: token.text(),
                        });
                    };

                    table.entries.push(XRefEntry {
                        obj_num: next_obj_num,
                        offset,
                        generation,
                        in_use,
                    });
                    remaining -= 1;
                    if remaining > 0 {
                        next_obj_num += 1;
                    }
                    state = if remaining == 0 {
                        XRefState::ObjStart
                    } else {
                        XRefState::ObjTabCol1
                    };
                }
                XRefState::Trailer => {}
            }
        }
    }

    /// Builds the error for an offset that does not point at `xref`.
    ///
    /// An indirect object header (`N G obj`) there means the file uses a
    /// cross-reference stream, which is reported separately.
    fn bad_offset(mut self, found: Token) -> PDFError {
        let is_number = |t: &Token| !t.is_empty() && t.as_bytes().iter().all(u8::is_ascii_digit);

        if is_number(&found) {
            let generation = self.cursor.next_token().ok();
            let keyword = self.cursor.next_token().ok();
            if let (Some(generation), Some(keyword)) = (generation, keyword) {
                if is_number(&generation) && keyword.is("obj") {
                    return PDFError::UnsupportedXRefFormat {
                        offset: self.xref_offset,
                        found: format!("{} {}", found, generation),
                    };
                }
            }
        }

        PDFError::BadXRefOffset {
            offset: self.xref_offset,
            found: found.text(),
        }
    }
}
