//! Display rows for the current chunk.

use chunked_reader::{LinePosition, LoadedChunk};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    /// 1-based.
    pub line_number: usize,
    pub text: String,
    pub expanded: bool,
    /// False for lines too long to ever be shown collapsed.
    pub collapsible: bool,
}

/// The found keyword within a display row, as a character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

/// Expansion state for a freshly loaded chunk: everything collapsed except long lines.
pub fn initial_expanded(chunk: &LoadedChunk, wrap_length: usize) -> Vec<bool> {
    (0..chunk.lines.len())
        .map(|row| !chunk.is_collapsible(row, wrap_length))
        .collect()
}

pub fn display_rows(chunk: &LoadedChunk, expanded: &[bool], wrap_length: usize) -> Vec<DisplayRow> {
    chunk
        .lines
        .iter()
        .enumerate()
        .map(|(row, text)| {
            let collapsible = chunk.is_collapsible(row, wrap_length);
            DisplayRow {
                line_number: chunk.display_line_number(row),
                text: text.clone(),
                expanded: !collapsible || expanded.get(row).copied().unwrap_or(false),
                collapsible,
            }
        })
        .collect()
}

/// Locates a match at `position` (document coordinates) in the chunk's rows. The first row
/// may start mid-line, so its columns are shifted by `first_line_column`.
pub fn highlight(chunk: &LoadedChunk, position: LinePosition, keyword_len: usize) -> Option<Highlight> {
    let row = chunk.row_of(position.line)?;
    let start = if row == 0 {
        position.offset.checked_sub(chunk.first_line_column)?
    } else {
        position.offset
    };
    Some(Highlight {
        row,
        start,
        end: start + keyword_len,
    })
}
