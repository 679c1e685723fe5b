//! IVTC Core - Backend logic for IVTC Workbench
//!
//! Manual inverse telecine projects: per-frame field matches and
//! decimation, sections with filter presets, pattern guessing, orphan
//! field tracking and undo. This crate has zero UI dependencies and is
//! shared by the GUI and the `ivtc` command line tool.

pub mod annotations;
pub mod changes;
pub mod config;
pub mod custom_lists;
pub mod error;
pub mod export;
pub mod frames;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod orphans;
pub mod patterns;
pub mod presets;
pub mod preview;
pub mod project;
pub mod schema;
pub mod script;
pub mod sections;
pub mod undo;

pub use changes::{Change, Changeset};
pub use error::{InUseWarning, ProjectError, ProjectResult};
pub use project::{ImportSelection, Project, ProjectState};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
