//! Project persistence schema.
//!
//! - **file**: the serde `ProjectFile` layout
//! - **codec**: JSON encoding and validated decoding into a `Project`

mod codec;
mod file;

pub use codec::{from_json, to_json, to_json_compact};
pub use file::{ProjectFile, CURRENT_VERSION};
