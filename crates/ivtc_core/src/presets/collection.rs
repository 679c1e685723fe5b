//! Preset storage.
//!
//! The collection only owns the bodies. Keeping references in sections and
//! custom lists consistent on rename/delete is done by the project.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, ProjectResult};
use crate::models::validate_identifier;

/// A named preset body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub body: String,
}

/// Presets keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetCollection {
    presets: BTreeMap<String, Preset>,
}

impl PresetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn get(&self, name: &str) -> ProjectResult<&Preset> {
        self.presets
            .get(name)
            .ok_or_else(|| ProjectError::not_found("Preset", name))
    }

    /// Presets in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    /// Add an empty preset.
    pub fn add(&mut self, name: &str) -> ProjectResult<()> {
        self.add_with_body(name, "")
    }

    pub fn add_with_body(&mut self, name: &str, body: &str) -> ProjectResult<()> {
        validate_identifier(name)?;
        if self.contains(name) {
            return Err(ProjectError::invalid_name(name, "a preset with this name already exists"));
        }
        self.presets.insert(
            name.to_string(),
            Preset {
                name: name.to_string(),
                body: body.to_string(),
            },
        );
        tracing::debug!("Added preset '{}'", name);
        Ok(())
    }

    /// Rename a preset. Returns false when `old == new`.
    pub fn rename(&mut self, old: &str, new: &str) -> ProjectResult<bool> {
        self.get(old)?;
        if old == new {
            return Ok(false);
        }
        validate_identifier(new)?;
        if self.contains(new) {
            return Err(ProjectError::invalid_name(new, "a preset with this name already exists"));
        }
        if let Some(mut preset) = self.presets.remove(old) {
            preset.name = new.to_string();
            self.presets.insert(new.to_string(), preset);
        }
        tracing::debug!("Renamed preset '{}' to '{}'", old, new);
        Ok(true)
    }

    /// Replace a preset's body. Returns whether it changed.
    pub fn set_body(&mut self, name: &str, body: &str) -> ProjectResult<bool> {
        let preset = self
            .presets
            .get_mut(name)
            .ok_or_else(|| ProjectError::not_found("Preset", name))?;
        if preset.body == body {
            return Ok(false);
        }
        preset.body = body.to_string();
        Ok(true)
    }

    /// Remove a preset and return it.
    pub fn remove(&mut self, name: &str) -> ProjectResult<Preset> {
        self.presets
            .remove(name)
            .ok_or_else(|| ProjectError::not_found("Preset", name))
    }

    /// Insert or overwrite a preset. Used by import.
    pub(crate) fn upsert(&mut self, preset: Preset) -> ProjectResult<()> {
        validate_identifier(&preset.name)?;
        self.presets.insert(preset.name.clone(), preset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_bad_and_duplicate_names() {
        let mut presets = PresetCollection::new();
        presets.add("deblock").unwrap();
        assert!(matches!(
            presets.add("deblock"),
            Err(ProjectError::InvalidName { .. })
        ));
        assert!(presets.add("1st").is_err());
        assert!(presets.add("has space").is_err());
        assert!(presets.add("").is_err());
        assert_eq!(presets.len(), 1);
    }

    #[test]
    fn rename_moves_body() {
        let mut presets = PresetCollection::new();
        presets.add_with_body("old", "clip = clip").unwrap();
        assert!(presets.rename("old", "new").unwrap());
        assert!(!presets.contains("old"));
        assert_eq!(presets.get("new").unwrap().body, "clip = clip");
        assert_eq!(presets.get("new").unwrap().name, "new");
        assert!(!presets.rename("new", "new").unwrap());
        assert!(presets.rename("missing", "x").is_err());
    }

    #[test]
    fn rename_onto_existing_fails_without_change() {
        let mut presets = PresetCollection::new();
        presets.add("a").unwrap();
        presets.add("b").unwrap();
        let before = presets.clone();
        assert!(presets.rename("a", "b").is_err());
        assert_eq!(presets, before);
    }

    #[test]
    fn set_body_reports_change() {
        let mut presets = PresetCollection::new();
        presets.add("a").unwrap();
        assert!(presets.set_body("a", "x").unwrap());
        assert!(!presets.set_body("a", "x").unwrap());
        assert!(presets.set_body("zz", "x").is_err());
    }
}
