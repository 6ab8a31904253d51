//! Viewer settings: defaults, the JSON settings file, and env overrides.

mod store;


pub use store::{ViewerSettings, load_settings, load_settings_from, parse_settings, settings_path};
