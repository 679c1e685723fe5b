//! Per-section orphan field derivation and the cache built on it.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use crate::frames::FrameDecisionTable;
use crate::models::{FieldKind, FrameRange, Match, OrphanField};
use crate::sections::SectionTable;

/// Orphan fields of one section, ordered by frame, at most one per frame.
///
/// A kept frame whose match borrows a field from a decimated neighbour in
/// the same section yields a record. So does a section starting on an `n`
/// match or ending on a `b` match, since that field belongs to the
/// neighbouring scene; those records carry the frame's own drop flag.
pub fn orphan_fields_in_section(
    decisions: &FrameDecisionTable,
    section: FrameRange,
) -> Vec<OrphanField> {
    let matches = decisions.matches();
    let decimated = decisions.decimation_flags();
    let mut found: BTreeMap<usize, OrphanField> = BTreeMap::new();

    for frame in section.first..=section.last.min(matches.len().saturating_sub(1)) {
        let m = matches[frame];
        if decimated[frame] {
            continue;
        }
        let (Some(offset), Some(field)) = (m.partner_offset(), m.replaced_field()) else {
            continue;
        };
        let Some(partner) = frame.checked_add_signed(offset) else {
            continue;
        };
        if section.contains(partner) && decimated[partner] {
            found.entry(frame).or_insert(OrphanField {
                frame,
                match_: m,
                field,
                decimated: false,
            });
        }
    }

    let mut boundary = |frame: usize, expected: Match, field: FieldKind| {
        if matches.get(frame) == Some(&expected) {
            found.entry(frame).or_insert(OrphanField {
                frame,
                match_: expected,
                field,
                decimated: decimated[frame],
            });
        }
    };
    boundary(section.first, Match::N, FieldKind::Bottom);
    boundary(section.last, Match::B, FieldKind::Top);

    found.into_values().collect()
}

/// Orphan fields of the whole clip, refreshed on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrphanFieldCache {
    fields: BTreeMap<usize, OrphanField>,
    /// Source ranges touched since the last refresh.
    stale: Vec<FrameRange>,
    stale_all: bool,
}

impl OrphanFieldCache {
    /// A cache with everything stale.
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            stale: Vec::new(),
            stale_all: true,
        }
    }

    /// Mark the sections overlapping `range` for recomputation.
    pub fn invalidate(&mut self, range: FrameRange) {
        if !self.stale_all {
            self.stale.push(range);
        }
    }

    pub fn invalidate_all(&mut self) {
        self.stale_all = true;
        self.stale.clear();
    }

    /// Drop everything and mark it stale.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.invalidate_all();
    }

    pub fn is_stale(&self) -> bool {
        self.stale_all || !self.stale.is_empty()
    }

    /// Recompute whatever is stale.
    pub fn refresh(&mut self, decisions: &FrameDecisionTable, sections: &SectionTable) {
        if self.stale_all {
            self.fields.clear();
            for section in sections.ranges() {
                self.insert_section(decisions, section);
            }
            tracing::trace!("Recomputed all orphan fields: {}", self.fields.len());
        } else {
            let mut touched: Vec<FrameRange> = Vec::new();
            for range in std::mem::take(&mut self.stale) {
                for section in sections.ranges() {
                    if section.overlaps(&range) && !touched.contains(&section) {
                        touched.push(section);
                    }
                }
            }
            for section in touched {
                let frames: Vec<usize> = self
                    .fields
                    .range(section.first..=section.last)
                    .map(|(&frame, _)| frame)
                    .collect();
                for frame in frames {
                    self.fields.remove(&frame);
                }
                self.insert_section(decisions, section);
            }
        }
        self.stale.clear();
        self.stale_all = false;
    }

    fn insert_section(&mut self, decisions: &FrameDecisionTable, section: FrameRange) {
        for field in orphan_fields_in_section(decisions, section) {
            self.fields.insert(field.frame, field);
        }
    }

    /// Cached fields in frame order. Only meaningful after `refresh`.
    pub fn fields(&self) -> impl Iterator<Item = &OrphanField> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn find_next(&self, frame: usize) -> Option<&OrphanField> {
        self.fields
            .range((Excluded(frame), Unbounded))
            .next()
            .map(|(_, f)| f)
    }

    pub fn find_previous(&self, frame: usize) -> Option<&OrphanField> {
        self.fields.range(..frame).next_back().map(|(_, f)| f)
    }
}
