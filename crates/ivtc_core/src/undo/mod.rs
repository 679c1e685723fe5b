//! Bounded undo/redo journal of labelled snapshots.

mod journal;

pub use journal::{UndoJournal, DEFAULT_MAX_STEPS};
