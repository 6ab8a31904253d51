//! STDIO bridge: JSON-RPC 2.0, one request per input line, one response per output line.
//!
//! Logs go to stderr, so stdout carries protocol messages only.

mod dispatch;
mod protocol;


pub use dispatch::{MethodError, MethodResult, execute_method, handle_line};
pub use protocol::{
    BridgeError, BridgeRequest, BridgeResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};

use std::io::{self, BufRead, Write};

use log::{info, warn};

use crate::settings::ViewerSettings;

/// Serves requests from `input` until it ends.
pub fn serve<R: BufRead, W: Write>(input: R, mut output: W, settings: &ViewerSettings) -> io::Result<()> {
    info!("textview bridge ready");

    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("Error reading input: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = handle_line(&line, settings) {
            serde_json::to_writer(&mut output, &response)?;
            output.write_all(b"\n")?;
            output.flush()?;
        }
    }

    info!("textview bridge input closed");
    Ok(())
}
