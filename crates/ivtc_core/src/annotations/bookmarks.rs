//! Bookmarks, at most one per frame.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use crate::error::{check_frame, ProjectError, ProjectResult};
use crate::models::Bookmark;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet {
    bookmarks: BTreeMap<usize, Bookmark>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.values()
    }

    pub fn get(&self, frame: usize) -> Option<&Bookmark> {
        self.bookmarks.get(&frame)
    }

    /// Add a bookmark, replacing the description of an existing one.
    ///
    /// Returns whether anything changed.
    pub fn add(
        &mut self,
        frame: usize,
        description: &str,
        frame_count: usize,
    ) -> ProjectResult<bool> {
        check_frame(frame, frame_count)?;
        let bookmark = Bookmark {
            frame,
            description: description.to_string(),
        };
        let previous = self.bookmarks.insert(frame, bookmark.clone());
        Ok(previous.as_ref() != Some(&bookmark))
    }

    pub fn delete(&mut self, frame: usize) -> ProjectResult<Bookmark> {
        self.bookmarks
            .remove(&frame)
            .ok_or_else(|| ProjectError::not_found("Bookmark at frame", frame))
    }

    pub fn find_next(&self, frame: usize) -> Option<&Bookmark> {
        self.bookmarks
            .range((Excluded(frame), Unbounded))
            .next()
            .map(|(_, b)| b)
    }

    pub fn find_previous(&self, frame: usize) -> Option<&Bookmark> {
        self.bookmarks.range(..frame).next_back().map(|(_, b)| b)
    }
}
