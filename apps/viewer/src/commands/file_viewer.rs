//! Commands for the file viewer.

use chunked_reader::TextEncoding;
use log::debug;

use crate::file_viewer::{self, SessionSummary, ViewerError, ViewerOpenResult, ViewerView};
use crate::settings::ViewerSettings;

fn parse_encoding(name: &str) -> Result<TextEncoding, String> {
    name.parse::<TextEncoding>()
        .map_err(|e| ViewerError::from(e).to_string())
}

/// Opens a viewer session for the given file.
/// `encoding` overrides the default encoding from settings.
pub fn viewer_open(
    path: String,
    encoding: Option<String>,
    settings: &ViewerSettings,
) -> Result<ViewerOpenResult, String> {
    let mut settings = settings.clone();
    if let Some(name) = encoding {
        settings.default_encoding = parse_encoding(&name)?;
    }
    debug!("viewer_open: path={}, encoding={}", path, settings.default_encoding);
    file_viewer::open_session(&path, &settings).map_err(|e| e.to_string())
}

pub fn viewer_list() -> Vec<SessionSummary> {
    file_viewer::list_sessions()
}

pub fn viewer_view(session_id: String) -> Result<ViewerView, String> {
    file_viewer::get_view(&session_id).map_err(|e| e.to_string())
}

/// Switches the session to another encoding by name (e.g. "UTF-16LE") and reloads from line 1.
pub fn viewer_set_encoding(session_id: String, encoding: String) -> Result<ViewerView, String> {
    let encoding = parse_encoding(&encoding)?;
    debug!("viewer_set_encoding: session={}, encoding={}", session_id, encoding);
    file_viewer::set_encoding(&session_id, encoding).map_err(|e| e.to_string())
}

/// Jumps to a line. `line` is the raw user input: 1-based digits.
pub fn viewer_goto(session_id: String, line: String) -> Result<ViewerView, String> {
    debug!("viewer_goto: session={}, line={:?}", session_id, line);
    file_viewer::goto_line(&session_id, &line).map_err(|e| e.to_string())
}

pub fn viewer_next(session_id: String, first_visible_row: usize) -> Result<ViewerView, String> {
    debug!("viewer_next: session={}, first_visible_row={}", session_id, first_visible_row);
    file_viewer::load_next_chunk(&session_id, first_visible_row).map_err(|e| e.to_string())
}

pub fn viewer_previous(session_id: String, first_visible_row: usize) -> Result<ViewerView, String> {
    debug!(
        "viewer_previous: session={}, first_visible_row={}",
        session_id, first_visible_row
    );
    file_viewer::load_previous_chunk(&session_id, first_visible_row).map_err(|e| e.to_string())
}

/// Finds the next occurrence of `keyword`; see `file_viewer::find` for where it starts.
pub fn viewer_find(session_id: String, keyword: String, first_visible_row: usize) -> Result<ViewerView, String> {
    debug!(
        "viewer_find: session={}, keyword_len={}, first_visible_row={}",
        session_id,
        keyword.chars().count(),
        first_visible_row
    );
    let view = file_viewer::find(&session_id, &keyword, first_visible_row).map_err(|e| e.to_string())?;

    debug!(
        "viewer_find: occurrence={:?}, scroll_to_row={:?}",
        view.occurrence, view.scroll_to_row
    );

    Ok(view)
}

pub fn viewer_dismiss_search(session_id: String) -> Result<ViewerView, String> {
    file_viewer::dismiss_search(&session_id).map_err(|e| e.to_string())
}

pub fn viewer_toggle_expanded(session_id: String, row: usize) -> Result<ViewerView, String> {
    file_viewer::toggle_expanded(&session_id, row).map_err(|e| e.to_string())
}

pub fn viewer_expand_all(session_id: String) -> Result<ViewerView, String> {
    file_viewer::expand_all(&session_id).map_err(|e| e.to_string())
}

pub fn viewer_collapse_all(session_id: String) -> Result<ViewerView, String> {
    file_viewer::collapse_all(&session_id).map_err(|e| e.to_string())
}

/// Closes a viewer session and frees its chunk.
pub fn viewer_close(session_id: String) -> Result<(), String> {
    file_viewer::close_session(&session_id).map_err(|e| e.to_string())
}

/// Encoding names the viewer accepts, in picker order.
pub fn viewer_encodings() -> Vec<&'static str> {
    TextEncoding::ALL.iter().map(|e| e.name()).collect()
}
