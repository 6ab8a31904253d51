//! File viewer module: sessions over a re-scanning chunked reader.
//!
//! Every navigation call re-reads the file from the start through `chunked_reader`, so a
//! session holds one chunk of lines and never an index.
//! - `session`: session cache and the navigation operations
//! - `navigation`: line input parsing, search start policy, kept scroll position
//! - `display`: rows, expansion and the search highlight of the current chunk

mod display;
mod navigation;
mod session;


pub use display::{DisplayRow, Highlight};
pub use navigation::parse_line_input;
pub use session::{
    SessionSummary, ViewerOpenResult, ViewerView, close_session, collapse_all, dismiss_search, expand_all, find,
    get_view, goto_line, list_sessions, load_next_chunk, load_previous_chunk, open_session, set_encoding,
    toggle_expanded,
};

use chunked_reader::ReaderError;
use chunked_reader::encoding::UnknownEncoding;

/// Errors from viewer sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    NotFound(String),
    IsDirectory,
    SessionNotFound(String),
    /// 1-based line the user asked for.
    TargetNotFound {
        line: usize,
    },
    /// There is no chunk before/after the current one.
    NoAdjacentChunk,
    InvalidLineInput(String),
    InvalidEncoding(String),
    InvalidKeyword(String),
    RowOutOfRange(usize),
    Reader(ReaderError),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "File not found: {}", path),
            Self::IsDirectory => write!(f, "Cannot view a directory"),
            Self::SessionNotFound(id) => write!(f, "Viewer session not found: {}", id),
            Self::TargetNotFound { line } => write!(f, "Line {} is past the end of the file", line),
            Self::NoAdjacentChunk => write!(f, "No more content in that direction"),
            Self::InvalidLineInput(input) => write!(f, "Not a valid line number: {:?}", input),
            Self::InvalidEncoding(name) => write!(f, "Unsupported encoding: {}", name),
            Self::InvalidKeyword(msg) => write!(f, "{}", msg),
            Self::RowOutOfRange(row) => write!(f, "Row {} is not on screen", row),
            Self::Reader(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ViewerError {}

impl From<ReaderError> for ViewerError {
    fn from(e: ReaderError) -> Self {
        match e {
            ReaderError::EmptyKeyword | ReaderError::KeywordTooLong { .. } => Self::InvalidKeyword(e.to_string()),
            other => Self::Reader(other),
        }
    }
}

impl From<UnknownEncoding> for ViewerError {
    fn from(e: UnknownEncoding) -> Self {
        Self::InvalidEncoding(e.0)
    }
}
