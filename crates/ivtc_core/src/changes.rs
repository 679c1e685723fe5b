//! Change notifications returned by mutators.
//!
//! Instead of observer callbacks, every mutator hands back a [`Changeset`]
//! describing what moved. An empty changeset means the call was a no-op.

use crate::models::FrameRange;

/// A single thing that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Matches changed in this source range.
    Matches(FrameRange),
    /// Decimation flags changed in this source range.
    Decimation(FrameRange),
    /// The section partition or a section's preset list changed in this range.
    Sections(FrameRange),
    Presets,
    CustomLists,
    FreezeFrames,
    Bookmarks,
    CombedFrames,
    OrphanFields,
    PatternGuessing,
    OutputSettings,
    /// Everything may have changed (undo, redo, import).
    All,
}

/// Ordered collection of changes produced by one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    changes: Vec<Change>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// A changeset with one entry.
    pub fn of(change: Change) -> Self {
        Self {
            changes: vec![change],
        }
    }

    /// Record a change, merging frame ranges of the same kind.
    pub fn push(&mut self, change: Change) {
        for existing in self.changes.iter_mut() {
            match (existing, &change) {
                (Change::Matches(a), Change::Matches(b))
                | (Change::Decimation(a), Change::Decimation(b))
                | (Change::Sections(a), Change::Sections(b)) => {
                    *a = a.union(b);
                    return;
                }
                (existing, change) if existing == change => return,
                _ => {}
            }
        }
        self.changes.push(change);
    }

    pub fn extend(&mut self, other: Changeset) {
        for change in other.changes {
            self.push(change);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Whether matches or decimation changed anywhere.
    pub fn touches_decisions(&self) -> bool {
        self.changes.iter().any(|c| {
            matches!(
                c,
                Change::Matches(_) | Change::Decimation(_) | Change::All
            )
        })
    }

    /// Whether decimation flags changed anywhere.
    pub fn touches_decimation(&self) -> bool {
        self.changes
            .iter()
            .any(|c| matches!(c, Change::Decimation(_) | Change::All))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_of_same_kind_merge() {
        let mut changes = Changeset::new();
        changes.push(Change::Matches(FrameRange::new(10, 12)));
        changes.push(Change::Decimation(FrameRange::new(4, 4)));
        changes.push(Change::Matches(FrameRange::new(2, 3)));
        changes.push(Change::Presets);
        changes.push(Change::Presets);

        assert_eq!(
            changes.changes(),
            &[
                Change::Matches(FrameRange::new(2, 12)),
                Change::Decimation(FrameRange::new(4, 4)),
                Change::Presets,
            ]
        );
        assert!(changes.touches_decisions());
        assert!(changes.touches_decimation());
    }

    #[test]
    fn empty_means_noop() {
        let changes = Changeset::new();
        assert!(changes.is_empty());
        assert!(!changes.touches_decisions());
    }
}
