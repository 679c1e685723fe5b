//! Orphan field diagnostics.
//!
//! Orphan fields are fully derived from matches, decimation and sections.
//! They are kept in a lazily refreshed cache that recomputes only the
//! sections touched since the last refresh.

mod analyzer;

pub use analyzer::{orphan_fields_in_section, OrphanFieldCache};
