//! Named presets: opaque filter text referenced by sections and custom lists.

mod collection;

pub use collection::{Preset, PresetCollection};
