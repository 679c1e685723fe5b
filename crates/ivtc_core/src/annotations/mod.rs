//! Auxiliary per-frame annotations: freeze frames, bookmarks and combed
//! frames. Orphan fields are derived and live in `orphans`.

mod bookmarks;
mod combed;
mod freeze;

pub use bookmarks::BookmarkSet;
pub use combed::CombedFrameSet;
pub use freeze::FreezeFrameSet;
