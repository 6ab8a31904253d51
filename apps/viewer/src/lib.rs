// Deny unused code to catch dead code early
#![deny(unused)]
// Warn on unused dependencies
#![warn(unused_crate_dependencies)]
// Warn on redundant path prefixes (e.g., std::path::Path when Path is imported)
#![warn(unused_qualifications)]
// Use log::* macros instead of println!/eprintln! for proper log level control
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod bridge;
pub mod commands;
pub mod config;
pub mod file_viewer;
mod ignore_poison;
pub mod settings;

use std::io;
use std::path::Path;

use log::{error, info};

/// Runs the stdio bridge until stdin closes.
pub fn run(settings_path: Option<&Path>) {
    // Initialize logging - respects RUST_LOG env var (default: info)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let settings = settings::load_settings(settings_path);
    info!(
        "textview starting: encoding={}, chunk_size={}, wrap_length={}",
        settings.default_encoding, settings.chunk_size, settings.wrap_length
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = bridge::serve(stdin.lock(), stdout.lock(), &settings) {
        error!("Bridge stopped: {}", e);
    }
}
