//! Request dispatch: one JSON line in, at most one response out.

use log::debug;
use serde::Serialize;
use serde_json::Value;

use super::protocol::{
    BridgeRequest, BridgeResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::commands::file_viewer as commands;
use crate::settings::ViewerSettings;

pub type MethodResult = Result<Value, MethodError>;

#[derive(Debug)]
pub struct MethodError {
    pub code: i32,
    pub message: String,
}

impl MethodError {
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: msg.into(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: format!("Unknown method: {}", method),
        }
    }
}

/// Handles one input line. Returns `None` for notifications.
pub fn handle_line(line: &str, settings: &ViewerSettings) -> Option<BridgeResponse> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(BridgeResponse::error(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
        }
    };

    let raw_id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: BridgeRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return Some(BridgeResponse::error(raw_id, INVALID_REQUEST, format!("Invalid request: {}", e)));
        }
    };
    if request.jsonrpc != "2.0" {
        return Some(BridgeResponse::error(
            raw_id,
            INVALID_REQUEST,
            format!("Unsupported jsonrpc version: {}", request.jsonrpc),
        ));
    }

    let result = execute_method(&request.method, &request.params, settings);

    let Some(id) = request.id else {
        debug!("handle_line: notification {} handled, ok={}", request.method, result.is_ok());
        return None;
    };
    Some(match result {
        Ok(value) => BridgeResponse::success(id, value),
        Err(e) => BridgeResponse::error(id, e.code, e.message),
    })
}

/// Executes a viewer method by name.
pub fn execute_method(method: &str, params: &Value, settings: &ViewerSettings) -> MethodResult {
    match method {
        "viewer/open" => {
            let path = required_str(params, "path")?;
            let encoding = optional_str(params, "encoding")?;
            to_result(commands::viewer_open(path, encoding, settings))
        }
        "viewer/list" => to_json(commands::viewer_list()),
        "viewer/encodings" => to_json(commands::viewer_encodings()),
        "viewer/view" => to_result(commands::viewer_view(session_id(params)?)),
        "viewer/setEncoding" => {
            let encoding = required_str(params, "encoding")?;
            to_result(commands::viewer_set_encoding(session_id(params)?, encoding))
        }
        "viewer/goto" => {
            let line = line_input(params)?;
            to_result(commands::viewer_goto(session_id(params)?, line))
        }
        "viewer/next" => to_result(commands::viewer_next(session_id(params)?, first_visible_row(params)?)),
        "viewer/previous" => to_result(commands::viewer_previous(
            session_id(params)?,
            first_visible_row(params)?,
        )),
        "viewer/find" => {
            let keyword = required_str(params, "keyword")?;
            to_result(commands::viewer_find(session_id(params)?, keyword, first_visible_row(params)?))
        }
        "viewer/dismissSearch" => to_result(commands::viewer_dismiss_search(session_id(params)?)),
        "viewer/toggleExpanded" => {
            let row = required_index(params, "row")?;
            to_result(commands::viewer_toggle_expanded(session_id(params)?, row))
        }
        "viewer/expandAll" => to_result(commands::viewer_expand_all(session_id(params)?)),
        "viewer/collapseAll" => to_result(commands::viewer_collapse_all(session_id(params)?)),
        "viewer/close" => to_result(commands::viewer_close(session_id(params)?)),
        _ => Err(MethodError::method_not_found(method)),
    }
}

fn to_json<T: Serialize>(value: T) -> MethodResult {
    serde_json::to_value(value).map_err(|e| MethodError::internal(e.to_string()))
}

fn to_result<T: Serialize>(result: Result<T, String>) -> MethodResult {
    to_json(result.map_err(MethodError::internal)?)
}

fn required_str(params: &Value, key: &str) -> Result<String, MethodError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| MethodError::invalid_params(format!("Missing '{}' parameter", key)))
}

fn optional_str(params: &Value, key: &str) -> Result<Option<String>, MethodError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(MethodError::invalid_params(format!("'{}' must be a string", key))),
    }
}

fn session_id(params: &Value) -> Result<String, MethodError> {
    required_str(params, "sessionId")
}

fn index_value(value: &Value, key: &str) -> Result<usize, MethodError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| MethodError::invalid_params(format!("'{}' must be a non-negative integer", key)))
}

fn required_index(params: &Value, key: &str) -> Result<usize, MethodError> {
    let value = params
        .get(key)
        .ok_or_else(|| MethodError::invalid_params(format!("Missing '{}' parameter", key)))?;
    index_value(value, key)
}

/// `firstVisibleRow` defaults to the top of the chunk.
fn first_visible_row(params: &Value) -> Result<usize, MethodError> {
    match params.get("firstVisibleRow") {
        None | Some(Value::Null) => Ok(0),
        Some(value) => index_value(value, "firstVisibleRow"),
    }
}

/// The goto input is what the user typed; numbers are accepted as a convenience.
fn line_input(params: &Value) -> Result<String, MethodError> {
    match params.get("line") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(MethodError::invalid_params("'line' must be a string or number")),
        None => Err(MethodError::invalid_params("Missing 'line' parameter")),
    }
}
