//! Identifier rules for preset and custom list names.
//!
//! Names end up as function and variable names in the generated pipeline,
//! so they follow identifier rules: non-empty, ASCII letters, digits and
//! underscores only, and not starting with a digit.

use crate::error::{ProjectError, ProjectResult};

/// Validate a preset or custom list name.
pub fn validate_identifier(name: &str) -> ProjectResult<()> {
    let mut chars = name.chars();

    let Some(first) = chars.next() else {
        return Err(ProjectError::invalid_name(name, "name is empty"));
    };

    if first.is_ascii_digit() {
        return Err(ProjectError::invalid_name(
            name,
            "name must not start with a digit",
        ));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(ProjectError::invalid_name(
            name,
            format!("'{}' is not a letter, digit or underscore", bad),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers() {
        assert!(validate_identifier("deblock").is_ok());
        assert!(validate_identifier("_fix2").is_ok());
        assert!(validate_identifier("A_b_9").is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2fast").is_err());
        assert!(validate_identifier("has space").is_err());
        assert!(validate_identifier("dash-ed").is_err());
        assert!(validate_identifier("ünï").is_err());
    }
}
