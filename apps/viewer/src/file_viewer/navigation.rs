//! Pure navigation rules: what the user typed, where a search starts, where to scroll.

use chunked_reader::{LinePosition, LoadedChunk, SearchStart};

use super::ViewerError;
use crate::config::LINE_INPUT_MAX_DIGITS;

/// Parses the "go to line" input (1-based, digits only) into a 0-based line.
/// `0` means the first line.
pub fn parse_line_input(input: &str) -> Result<usize, ViewerError> {
    let digits = input.trim();
    if digits.is_empty() || digits.len() > LINE_INPUT_MAX_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ViewerError::InvalidLineInput(input.to_string()));
    }
    let line: usize = digits
        .parse()
        .map_err(|_| ViewerError::InvalidLineInput(input.to_string()))?;
    Ok(line.saturating_sub(1))
}

/// Where a find starts:
/// - after the previous match, if there is one, even when the keyword changed
/// - from the top when the same keyword already ran out of matches
/// - from the first visible line otherwise
pub fn search_start(
    active_keyword: Option<&str>,
    cursor: Option<LinePosition>,
    keyword: &str,
    first_visible_line: usize,
) -> SearchStart {
    match cursor {
        Some(cursor) => SearchStart::After(cursor),
        None if active_keyword == Some(keyword) => SearchStart::Beginning,
        None => SearchStart::Line(first_visible_line),
    }
}

/// Row to scroll to after paging so the reader keeps their place: the previously first
/// visible line if the new chunk shows it, else the nearest edge of the new chunk.
pub fn kept_row(chunk: &LoadedChunk, kept_line: usize) -> usize {
    let last_row = chunk.lines.len().saturating_sub(1);
    kept_line
        .checked_sub(chunk.base_line_number)
        .map_or(0, |row| row.min(last_row))
}
