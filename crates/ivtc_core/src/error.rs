//! Error types for project operations.
//!
//! Every failure is local to a single call and leaves the project
//! unchanged. Deleting something that is still referenced is not an error;
//! it succeeds and hands back an [`InUseWarning`].

use thiserror::Error;

/// Errors returned by project mutators and queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// A frame or index is outside its valid bounds.
    #[error("{what} {value} is out of range (valid: 0..{limit})")]
    OutOfRange {
        what: String,
        value: usize,
        limit: usize,
    },

    /// A range has `first > last`.
    #[error("Invalid range [{first},{last}]: first frame is after last frame")]
    InvalidRange { first: usize, last: usize },

    /// A preset or custom list name fails identifier rules or collides.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A range conflicts with an existing range.
    #[error("Range [{first},{last}] overlaps existing range [{existing_first},{existing_last}]")]
    OverlappingRange {
        first: usize,
        last: usize,
        existing_first: usize,
        existing_last: usize,
    },

    /// Lookup by name, frame or start failed.
    #[error("{what} '{key}' not found")]
    NotFound { what: String, key: String },

    /// Something already exists at the requested key.
    #[error("{what} '{key}' already exists")]
    AlreadyExists { what: String, key: String },

    /// The section starting at frame 0 cannot be deleted.
    #[error("The section starting at frame 0 cannot be deleted")]
    ProtectedSection,

    /// A decimated frame has no output frame number.
    #[error("Frame {frame} is decimated and has no output frame number")]
    NotRepresented { frame: usize },

    /// A match or decimation pattern is malformed.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Metric-based work requested without the metrics it needs.
    #[error("Missing metrics: {0}")]
    MissingMetrics(String),

    /// A loaded project violates an invariant.
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    /// JSON encoding or decoding failed.
    #[error("Failed to (de)serialize project: {0}")]
    Serialization(String),
}

impl ProjectError {
    /// Create an out-of-range error.
    pub fn out_of_range(what: impl Into<String>, value: usize, limit: usize) -> Self {
        Self::OutOfRange {
            what: what.into(),
            value,
            limit,
        }
    }

    /// Create an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(what: impl Into<String>, key: impl ToString) -> Self {
        Self::NotFound {
            what: what.into(),
            key: key.to_string(),
        }
    }

    /// Create an already exists error.
    pub fn already_exists(what: impl Into<String>, key: impl ToString) -> Self {
        Self::AlreadyExists {
            what: what.into(),
            key: key.to_string(),
        }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid project error.
    pub fn invalid_project(message: impl Into<String>) -> Self {
        Self::InvalidProject(message.into())
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Returned when something that is still referenced was deleted.
///
/// The deletion went through; callers use this to confirm with the user or
/// refresh whatever showed the dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InUseWarning {
    /// Kind of the deleted entity ("Preset", "Custom list").
    pub what: String,
    /// Name of the deleted entity.
    pub name: String,
    /// Human-readable list of the places that referenced it.
    pub used_by: Vec<String>,
}

impl std::fmt::Display for InUseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' was in use by: {}",
            self.what,
            self.name,
            self.used_by.join(", ")
        )
    }
}

/// Check a frame index against a frame count.
pub(crate) fn check_frame(frame: usize, frame_count: usize) -> ProjectResult<()> {
    if frame >= frame_count {
        return Err(ProjectError::out_of_range("Frame", frame, frame_count));
    }
    Ok(())
}

/// Check an inclusive range against a frame count.
pub(crate) fn check_range(first: usize, last: usize, frame_count: usize) -> ProjectResult<()> {
    if first > last {
        return Err(ProjectError::InvalidRange { first, last });
    }
    check_frame(first, frame_count)?;
    check_frame(last, frame_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_displays_limit() {
        let err = ProjectError::out_of_range("Frame", 12, 10);
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("0..10"));
    }

    #[test]
    fn range_checks() {
        assert!(check_range(0, 9, 10).is_ok());
        assert_eq!(
            check_range(5, 4, 10),
            Err(ProjectError::InvalidRange { first: 5, last: 4 })
        );
        assert!(matches!(
            check_range(5, 10, 10),
            Err(ProjectError::OutOfRange { value: 10, .. })
        ));
    }

    #[test]
    fn in_use_warning_lists_users() {
        let warning = InUseWarning {
            what: "Preset".to_string(),
            name: "deblock".to_string(),
            used_by: vec!["section 0".to_string(), "custom list 'ops'".to_string()],
        };
        assert_eq!(
            warning.to_string(),
            "Preset 'deblock' was in use by: section 0, custom list 'ops'"
        );
    }
}
