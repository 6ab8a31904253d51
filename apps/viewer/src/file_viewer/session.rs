//! ViewerSession — one open file, the chunk on screen, and the search cursor.
//!
//! Sessions are cached by ID and removed on close. Navigation re-scans the file from the
//! start, so the cache lock is released while the reader runs and retaken to apply the result.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Mutex};

use chunked_reader::{
    ChunkedLineReader, KeywordQuery, LinePosition, LoadedChunk, OccurrenceResult, TextEncoding, TextSource,
};
use log::debug;
use serde::Serialize;

use super::ViewerError;
use super::display::{self, DisplayRow, Highlight};
use super::navigation::{self, kept_row, parse_line_input};
use crate::ignore_poison::IgnorePoison;
use crate::settings::ViewerSettings;

/// Result returned when opening a viewer session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerOpenResult {
    pub session_id: String,
    pub file_name: String,
    pub encoding: TextEncoding,
    /// The first chunk of the file.
    pub view: ViewerView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub file_name: String,
    pub encoding: TextEncoding,
}

/// Everything the frontend needs to draw a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerView {
    pub session_id: String,
    pub file_name: String,
    pub encoding: TextEncoding,
    pub chunk_index: usize,
    /// 0 for an empty file.
    pub total_chunks: usize,
    pub rows: Vec<DisplayRow>,
    pub keyword: Option<String>,
    pub occurrence: Option<OccurrenceResult>,
    pub highlight: Option<Highlight>,
    /// Show the "load previous" prompt at the top.
    pub can_load_previous: bool,
    /// Show the "load next" prompt at the bottom.
    pub can_load_next: bool,
    /// Row to scroll to after this call, if it moved the view.
    pub scroll_to_row: Option<usize>,
}

#[derive(Debug, Default)]
struct SearchState {
    keyword: Option<String>,
    /// Last found match; cleared when a search runs out of matches.
    cursor: Option<LinePosition>,
    occurrence: Option<OccurrenceResult>,
}

struct ViewerSession {
    id: String,
    source: TextSource,
    reader: ChunkedLineReader,
    wrap_length: usize,
    /// `None` only for an empty file.
    chunk: Option<LoadedChunk>,
    expanded: Vec<bool>,
    search: SearchState,
    opened: u64,
}

#[derive(Debug, Clone, Copy)]
enum Page {
    Previous,
    Next,
}

/// Global session cache.
static SESSIONS: LazyLock<Mutex<HashMap<String, ViewerSession>>> = LazyLock::new(|| Mutex::new(HashMap::new()));

static OPEN_COUNTER: AtomicU64 = AtomicU64::new(0);

fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Expands tilde (~) to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if (path.starts_with("~/") || path == "~")
        && let Some(home) = dirs::home_dir()
    {
        return path.replacen("~", &home.to_string_lossy(), 1);
    }
    path.to_string()
}

impl ViewerSession {
    fn show(&mut self, chunk: Option<LoadedChunk>) {
        self.expanded = chunk
            .as_ref()
            .map(|c| display::initial_expanded(c, self.wrap_length))
            .unwrap_or_default();
        self.chunk = chunk;
    }

    fn chunk_index(&self) -> usize {
        self.chunk.as_ref().map_or(0, |c| c.chunk_index)
    }

    fn total_chunks(&self) -> usize {
        self.chunk.as_ref().map_or(0, |c| c.total_chunks)
    }

    fn can_load(&self, page: Page) -> bool {
        match page {
            Page::Previous => self.chunk_index() > 0,
            Page::Next => self.chunk_index() + 1 < self.total_chunks(),
        }
    }

    /// Absolute line shown at `row`, clamped to the chunk.
    fn visible_line(&self, row: usize) -> usize {
        self.chunk.as_ref().map_or(0, |c| {
            let last_row = c.lines.len().saturating_sub(1);
            c.absolute_line(row.min(last_row))
        })
    }

    fn file_name(&self) -> String {
        self.source.name().to_string()
    }

    fn view(&self, scroll_to_row: Option<usize>) -> ViewerView {
        let rows = self
            .chunk
            .as_ref()
            .map(|c| display::display_rows(c, &self.expanded, self.wrap_length))
            .unwrap_or_default();
        let highlight = match (&self.chunk, self.search.cursor, &self.search.keyword) {
            (Some(chunk), Some(position), Some(keyword)) => {
                display::highlight(chunk, position, keyword.chars().count())
            }
            _ => None,
        };

        ViewerView {
            session_id: self.id.clone(),
            file_name: self.file_name(),
            encoding: self.source.encoding(),
            chunk_index: self.chunk_index(),
            total_chunks: self.total_chunks(),
            rows,
            keyword: self.search.keyword.clone(),
            occurrence: self.search.occurrence,
            highlight,
            can_load_previous: self.can_load(Page::Previous),
            can_load_next: self.can_load(Page::Next),
            scroll_to_row,
        }
    }
}

/// Runs `f` on a cached session while holding the cache lock.
fn with_session<T>(
    session_id: &str,
    f: impl FnOnce(&mut ViewerSession) -> Result<T, ViewerError>,
) -> Result<T, ViewerError> {
    let mut sessions = SESSIONS.lock_ignore_poison();
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| ViewerError::SessionNotFound(session_id.to_string()))?;
    f(session)
}

/// What a scan needs, copied out so the file is read without the cache lock.
fn scan_inputs(session_id: &str) -> Result<(TextSource, ChunkedLineReader), ViewerError> {
    with_session(session_id, |s| Ok((s.source.clone(), s.reader.clone())))
}

/// Opens a viewer session and loads the first chunk.
pub fn open_session(path: &str, settings: &ViewerSettings) -> Result<ViewerOpenResult, ViewerError> {
    let expanded = expand_tilde(path);
    let file_path = PathBuf::from(&expanded);

    if !file_path.exists() {
        return Err(ViewerError::NotFound(path.to_string()));
    }
    if file_path.is_dir() {
        return Err(ViewerError::IsDirectory);
    }

    let source = TextSource::file(file_path, settings.default_encoding);
    let reader = ChunkedLineReader::new(settings.reader_config());
    let first_chunk = reader.locate_chunk_by_index(&source, 0)?;

    let mut session = ViewerSession {
        id: generate_session_id(),
        source,
        reader,
        wrap_length: settings.wrap_length,
        chunk: None,
        expanded: Vec::new(),
        search: SearchState::default(),
        opened: OPEN_COUNTER.fetch_add(1, Ordering::Relaxed),
    };
    session.show(first_chunk);

    let view = session.view(None);
    debug!(
        "open_session: session={}, path={}, encoding={}, total_chunks={}",
        session.id, expanded, view.encoding, view.total_chunks
    );

    let result = ViewerOpenResult {
        session_id: session.id.clone(),
        file_name: view.file_name.clone(),
        encoding: view.encoding,
        view,
    };
    SESSIONS.lock_ignore_poison().insert(session.id.clone(), session);

    Ok(result)
}

/// Open sessions, oldest first.
pub fn list_sessions() -> Vec<SessionSummary> {
    let sessions = SESSIONS.lock_ignore_poison();
    let mut open: Vec<&ViewerSession> = sessions.values().collect();
    open.sort_by_key(|s| s.opened);
    open.into_iter()
        .map(|s| SessionSummary {
            session_id: s.id.clone(),
            file_name: s.file_name(),
            encoding: s.source.encoding(),
        })
        .collect()
}

pub fn get_view(session_id: &str) -> Result<ViewerView, ViewerError> {
    with_session(session_id, |s| Ok(s.view(None)))
}

/// Switches the encoding and reloads from the first line. The search cursor is dropped
/// since positions change with the decoding.
pub fn set_encoding(session_id: &str, encoding: TextEncoding) -> Result<ViewerView, ViewerError> {
    let (source, reader) = scan_inputs(session_id)?;
    let source = source.with_encoding(encoding);
    let chunk = reader.locate_by_line_number(&source, 0)?;

    debug!("set_encoding: session={}, encoding={}", session_id, encoding);

    with_session(session_id, |s| {
        s.source = source;
        s.search.cursor = None;
        s.search.occurrence = None;
        s.show(chunk);
        Ok(s.view(Some(0)))
    })
}

/// Jumps to the line the user typed (1-based). The chunk on screen is kept when the line
/// is past the end of the file.
pub fn goto_line(session_id: &str, input: &str) -> Result<ViewerView, ViewerError> {
    let target = parse_line_input(input)?;
    let (source, reader) = scan_inputs(session_id)?;

    let Some(chunk) = reader.locate_by_line_number(&source, target)? else {
        debug!("goto_line: session={}, line {} not found", session_id, target + 1);
        return Err(ViewerError::TargetNotFound { line: target + 1 });
    };
    let row = chunk.row_of(target);

    with_session(session_id, |s| {
        s.show(Some(chunk));
        Ok(s.view(row))
    })
}

pub fn load_next_chunk(session_id: &str, first_visible_row: usize) -> Result<ViewerView, ViewerError> {
    load_adjacent_chunk(session_id, first_visible_row, Page::Next)
}

pub fn load_previous_chunk(session_id: &str, first_visible_row: usize) -> Result<ViewerView, ViewerError> {
    load_adjacent_chunk(session_id, first_visible_row, Page::Previous)
}

fn load_adjacent_chunk(session_id: &str, first_visible_row: usize, page: Page) -> Result<ViewerView, ViewerError> {
    let (source, reader, index, kept_line) = with_session(session_id, |s| {
        if !s.can_load(page) {
            return Err(ViewerError::NoAdjacentChunk);
        }
        let index = match page {
            Page::Previous => s.chunk_index() - 1,
            Page::Next => s.chunk_index() + 1,
        };
        Ok((
            s.source.clone(),
            s.reader.clone(),
            index,
            s.visible_line(first_visible_row),
        ))
    })?;

    // The file may have shrunk since the prompt was shown.
    let chunk = reader
        .locate_chunk_by_index(&source, index)?
        .ok_or(ViewerError::NoAdjacentChunk)?;
    let row = kept_row(&chunk, kept_line);

    debug!(
        "load_adjacent_chunk: session={}, page={:?}, chunk_index={}, kept_line={}, row={}",
        session_id, page, index, kept_line, row
    );

    with_session(session_id, |s| {
        s.show(Some(chunk));
        Ok(s.view(Some(row)))
    })
}

/// Finds the next occurrence of `keyword`. A miss keeps the chunk on screen and clears the
/// cursor, so searching the same keyword again starts over from the top.
pub fn find(session_id: &str, keyword: &str, first_visible_row: usize) -> Result<ViewerView, ViewerError> {
    let (source, reader, query) = with_session(session_id, |s| {
        let start = navigation::search_start(
            s.search.keyword.as_deref(),
            s.search.cursor,
            keyword,
            s.visible_line(first_visible_row),
        );
        let query = KeywordQuery::new(keyword, start, s.reader.config())?;
        Ok((s.source.clone(), s.reader.clone(), query))
    })?;

    let result = reader.locate_keyword(&source, &query)?;
    let found = result.occurrence.found_position;

    debug!(
        "find: session={}, start={:?}, found={:?}, match {}/{}",
        session_id,
        query.start(),
        found,
        result.occurrence.match_index,
        result.occurrence.total_matches
    );

    with_session(session_id, |s| {
        s.search.keyword = Some(keyword.to_string());
        s.search.cursor = found;
        s.search.occurrence = Some(result.occurrence);

        let scroll_to_row = match (result.chunk, found) {
            (Some(chunk), Some(position)) => {
                let row = chunk.row_of(position.line);
                s.show(Some(chunk));
                row
            }
            _ => None,
        };
        Ok(s.view(scroll_to_row))
    })
}

pub fn dismiss_search(session_id: &str) -> Result<ViewerView, ViewerError> {
    with_session(session_id, |s| {
        s.search = SearchState::default();
        Ok(s.view(None))
    })
}

/// Flips a row between collapsed and expanded. Rows too long to collapse stay expanded.
pub fn toggle_expanded(session_id: &str, row: usize) -> Result<ViewerView, ViewerError> {
    with_session(session_id, |s| {
        let collapsible = s
            .chunk
            .as_ref()
            .filter(|c| row < c.lines.len())
            .map(|c| c.is_collapsible(row, s.wrap_length))
            .ok_or(ViewerError::RowOutOfRange(row))?;
        if collapsible {
            s.expanded[row] = !s.expanded[row];
        }
        Ok(s.view(None))
    })
}

pub fn expand_all(session_id: &str) -> Result<ViewerView, ViewerError> {
    with_session(session_id, |s| {
        s.expanded.fill(true);
        Ok(s.view(None))
    })
}

pub fn collapse_all(session_id: &str) -> Result<ViewerView, ViewerError> {
    with_session(session_id, |s| {
        s.expanded = s
            .chunk
            .as_ref()
            .map(|c| display::initial_expanded(c, s.wrap_length))
            .unwrap_or_default();
        Ok(s.view(None))
    })
}

/// Closes a viewer session. Closing an unknown session is not an error.
pub fn close_session(session_id: &str) -> Result<(), ViewerError> {
    if SESSIONS.lock_ignore_poison().remove(session_id).is_some() {
        debug!("close_session: session={}", session_id);
    }
    Ok(())
}
