//! Settings loading from `settings.json`.
//!
//! Keys may be camelCase (as written by the frontend) or snake_case. A missing or unparseable
//! file means defaults; out-of-range numbers are clamped rather than rejected.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chunked_reader::{CHUNK_SIZE, KEYWORD_MAX_LENGTH, ReaderConfig, TextEncoding};
use log::{debug, warn};
use serde::Deserialize;

use crate::config::{ENCODING_ENV, SETTINGS_DIR_NAME, SETTINGS_FILE_NAME, SETTINGS_PATH_ENV, WRAP_LENGTH};

/// Smallest chunk that still gives a non-empty half-chunk stride.
const MIN_CHUNK_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewerSettings {
    #[serde(alias = "defaultEncoding", default)]
    pub default_encoding: TextEncoding,
    /// Characters per loaded chunk.
    #[serde(alias = "chunkSize", default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(alias = "keywordMaxLength", default = "default_keyword_max_length")]
    pub keyword_max_length: usize,
    #[serde(alias = "wrapLength", default = "default_wrap_length")]
    pub wrap_length: usize,
}

fn default_chunk_size() -> usize {
    CHUNK_SIZE
}

fn default_keyword_max_length() -> usize {
    KEYWORD_MAX_LENGTH
}

fn default_wrap_length() -> usize {
    WRAP_LENGTH
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            default_encoding: TextEncoding::default(),
            chunk_size: CHUNK_SIZE,
            keyword_max_length: KEYWORD_MAX_LENGTH,
            wrap_length: WRAP_LENGTH,
        }
    }
}

impl ViewerSettings {
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            chunk_size: self.chunk_size,
            keyword_max_length: self.keyword_max_length,
        }
    }

    fn clamped(mut self) -> Self {
        self.chunk_size = self.chunk_size.max(MIN_CHUNK_SIZE);
        self.keyword_max_length = self.keyword_max_length.max(1);
        self.wrap_length = self.wrap_length.max(1);
        self
    }
}

/// Where settings are read from: `TEXTVIEW_SETTINGS` if set, else
/// `<config dir>/textview/settings.json`.
pub fn settings_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(SETTINGS_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
}

/// Loads settings from `path_override` or the default location, then applies env overrides.
/// Priority: env vars > settings file > defaults.
pub fn load_settings(path_override: Option<&Path>) -> ViewerSettings {
    let path = path_override.map(Path::to_path_buf).or_else(settings_path);
    let settings = match path {
        Some(path) => load_settings_from(&path),
        None => ViewerSettings::default(),
    };
    apply_env_overrides(settings)
}

/// Loads settings from `path`. Returns defaults if the file doesn't exist or can't be parsed.
pub fn load_settings_from(path: &Path) -> ViewerSettings {
    let Ok(contents) = fs::read_to_string(path) else {
        debug!("load_settings_from: no settings at {}, using defaults", path.display());
        return ViewerSettings::default();
    };

    match parse_settings(&contents) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
            ViewerSettings::default()
        }
    }
}

pub fn parse_settings(contents: &str) -> Result<ViewerSettings, serde_json::Error> {
    let settings: ViewerSettings = serde_json::from_str(contents)?;
    Ok(settings.clamped())
}

fn apply_env_overrides(mut settings: ViewerSettings) -> ViewerSettings {
    if let Ok(name) = env::var(ENCODING_ENV) {
        match name.parse() {
            Ok(encoding) => settings.default_encoding = encoding,
            Err(e) => warn!("Ignoring {}: {}", ENCODING_ENV, e),
        }
    }
    settings
}
