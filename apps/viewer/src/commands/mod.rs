//! Commands module: string-typed entry points called by the bridge.

pub mod file_viewer;
