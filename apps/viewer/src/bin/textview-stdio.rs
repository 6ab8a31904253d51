//! Text viewer STDIO bridge binary.
//!
//! Reads JSON-RPC requests from stdin, one per line, and writes responses to stdout.
//!
//! Usage:
//!   textview-stdio [--settings PATH]
//!
//! Environment variables:
//!   TEXTVIEW_SETTINGS - Settings file (default: <config dir>/textview/settings.json)
//!   TEXTVIEW_ENCODING - Default encoding, overriding the settings file
//!   RUST_LOG          - Log filter for stderr output (default: info)

use std::env;
use std::path::PathBuf;

fn get_settings_path() -> Option<PathBuf> {
    let args: Vec<String> = env::args().collect();
    args.windows(2)
        .find(|pair| pair[0] == "--settings")
        .map(|pair| PathBuf::from(&pair[1]))
}

fn main() {
    textview_lib::run(get_settings_path().as_deref());
}
