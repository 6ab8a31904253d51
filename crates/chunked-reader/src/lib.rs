//! Chunked line reader: serves windows of a decoded text stream without an index.
//!
//! Every query re-reads the source from byte 0 and walks it in half-chunk strides:
//! - `locate_chunk_by_index`: the n-th stride, for forward/backward paging
//! - `locate_by_line_number`: the first stride reaching an absolute line
//! - `locate_keyword`: the first keyword occurrence after a cursor, plus match totals
//!
//! Nothing is cached between calls, so memory stays at one chunk of decoded characters
//! no matter how large the file is.

// Use log::* macros instead of println!/eprintln! for proper log level control
#![deny(clippy::print_stdout, clippy::print_stderr)]
#![warn(unused_qualifications)]

mod char_stream;
pub mod encoding;
pub mod lines;
pub mod occurrences;
mod reader;
mod source;

#[cfg(test)]
mod reader_test;

pub use char_stream::CharStream;
pub use encoding::{StreamDecoder, TextEncoding, decode};
pub use lines::split_lines;
pub use occurrences::{count_occurrences, match_columns};
pub use reader::ChunkedLineReader;
pub use source::{ByteSource, FileSource, MemorySource, TextSource};

use serde::Serialize;

/// Size of a materialized chunk, in decoded characters (1 Mi).
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Longest keyword a search accepts, in characters.
pub const KEYWORD_MAX_LENGTH: usize = 1024;

/// Lines at least this many characters long are always shown wrapped.
pub const WRAP_LENGTH: usize = 1024;

/// Tunables for a reader. Tests shrink `chunk_size` to exercise stride boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    pub chunk_size: usize,
    pub keyword_max_length: usize,
}

impl ReaderConfig {
    /// Distance between stride starts; half a chunk, never zero.
    pub fn probe_size(&self) -> usize {
        (self.chunk_size / 2).max(1)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            keyword_max_length: KEYWORD_MAX_LENGTH,
        }
    }
}

/// An absolute location in the decoded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePosition {
    /// 0-based.
    pub line: usize,
    /// Character offset from the start of the line.
    pub offset: usize,
}

impl LinePosition {
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// Where a keyword search starts honoring matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStart {
    /// From the first character of the document.
    Beginning,
    /// From the first character of this line.
    Line(usize),
    /// Strictly after a previously returned match.
    After(LinePosition),
}

impl SearchStart {
    /// Leftmost column that may match on `line`, or `None` if the line is before the cursor.
    pub(crate) fn min_column(&self, line: usize) -> Option<usize> {
        match *self {
            Self::Beginning => Some(0),
            Self::Line(start) => (line >= start).then_some(0),
            Self::After(pos) if line == pos.line => Some(pos.offset + 1),
            Self::After(pos) => (line > pos.line).then_some(0),
        }
    }
}

/// A validated keyword search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordQuery {
    keyword: String,
    start: SearchStart,
}

impl KeywordQuery {
    pub fn new(keyword: impl Into<String>, start: SearchStart, config: &ReaderConfig) -> Result<Self, ReaderError> {
        let keyword = keyword.into();
        let length = keyword.chars().count();
        if length == 0 {
            return Err(ReaderError::EmptyKeyword);
        }
        if length > config.keyword_max_length {
            return Err(ReaderError::KeywordTooLong {
                length,
                max: config.keyword_max_length,
            });
        }
        Ok(Self { keyword, start })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn start(&self) -> SearchStart {
        self.start
    }

    /// Keyword length in characters.
    pub(crate) fn char_len(&self) -> usize {
        self.keyword.chars().count()
    }
}

/// One window of decoded lines, as returned by every locate operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedChunk {
    /// Decoded lines in document order, without terminators.
    pub lines: Vec<String>,
    /// Absolute 0-based line number of `lines[0]`.
    pub base_line_number: usize,
    /// 0-based stride index this chunk starts at.
    pub chunk_index: usize,
    /// Number of strides in the whole document.
    pub total_chunks: usize,
    /// Column at which `lines[0]` starts; non-zero when the chunk begins mid-line.
    pub first_line_column: usize,
}

impl LoadedChunk {
    /// 1-based line number shown next to `lines[index]`.
    pub fn display_line_number(&self, index: usize) -> usize {
        self.base_line_number + index + 1
    }

    /// Absolute 0-based line number of `lines[index]`.
    pub fn absolute_line(&self, index: usize) -> usize {
        self.base_line_number + index
    }

    /// Row holding absolute `line`, if this chunk shows it.
    pub fn row_of(&self, line: usize) -> Option<usize> {
        let row = line.checked_sub(self.base_line_number)?;
        (row < self.lines.len()).then_some(row)
    }

    /// Whether the user may collapse `lines[index]`. Lines of `wrap_length` characters or
    /// more are always expanded.
    pub fn is_collapsible(&self, index: usize, wrap_length: usize) -> bool {
        self.lines
            .get(index)
            .is_some_and(|line| line.chars().count() < wrap_length)
    }
}

/// Outcome of a keyword scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceResult {
    pub found_position: Option<LinePosition>,
    /// 1-based index of the found match among all matches; 0 when nothing was found.
    pub match_index: usize,
    /// Matches in the whole document.
    pub total_matches: usize,
}

/// Result of `locate_keyword`: the chunk holding the match (if any) and the counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSearch {
    pub chunk: Option<LoadedChunk>,
    pub occurrence: OccurrenceResult,
}

/// Errors from the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    /// The byte source could not be opened.
    StreamUnavailable(String),
    /// Reading failed partway through the stream.
    Read(String),
    EmptyKeyword,
    KeywordTooLong { length: usize, max: usize },
}

impl std::fmt::Display for ReaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StreamUnavailable(msg) => write!(f, "Cannot open text source: {}", msg),
            Self::Read(msg) => write!(f, "Read failed: {}", msg),
            Self::EmptyKeyword => write!(f, "Search keyword cannot be empty"),
            Self::KeywordTooLong { length, max } => {
                write!(f, "Search keyword is {} characters long, the limit is {}", length, max)
            }
        }
    }
}

impl std::error::Error for ReaderError {}

impl From<std::io::Error> for ReaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Read(e.to_string())
    }
}
