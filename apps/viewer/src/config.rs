//! Configuration constants for the text viewer.
//!
//! Tunables a user may change live in `settings`; these are fixed.

/// Lines at least this many characters long are always shown expanded.
pub const WRAP_LENGTH: usize = chunked_reader::WRAP_LENGTH;

/// Longest accepted "go to line" input, in digits.
pub const LINE_INPUT_MAX_DIGITS: usize = 9;

/// Directory under the platform config dir holding the settings file.
pub const SETTINGS_DIR_NAME: &str = "textview";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Env var pointing at an alternative settings file.
pub const SETTINGS_PATH_ENV: &str = "TEXTVIEW_SETTINGS";

/// Env var overriding the default encoding (e.g. `TEXTVIEW_ENCODING=UTF-16LE`).
pub const ENCODING_ENV: &str = "TEXTVIEW_ENCODING";
