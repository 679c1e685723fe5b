//! Sections: a contiguous partition of the source frames.
//!
//! Each section runs from its start to the frame before the next section's
//! start and carries an ordered list of preset names applied to its frames.

mod table;

pub use table::{Section, SectionTable};
