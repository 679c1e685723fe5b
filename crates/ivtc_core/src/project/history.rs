//! Undo, redo and the modified flag.

use super::Project;

impl Project {
    /// Record the current state as one undoable step.
    ///
    /// Nothing is recorded if the state matches the last step.
    pub fn commit(&mut self, description: &str) {
        if self.journal.current() == &self.state {
            tracing::trace!("Nothing to commit for '{}'", description);
            return;
        }
        self.journal.commit(description, self.state.clone());
        self.modified = true;
    }

    /// Forget all undo history; the current state becomes the starting point.
    pub fn clear_history(&mut self) {
        self.journal.reset(self.state.clone());
    }

    /// Revert the last committed step. Returns its description, or "" if
    /// there was nothing to undo.
    pub fn undo(&mut self) -> String {
        let Some((description, state)) = self.journal.undo() else {
            return String::new();
        };
        self.state = state.clone();
        self.everything_changed();
        self.modified = true;
        tracing::debug!("Undid '{}'", description);
        description
    }

    /// Reapply the last undone step. Returns its description, or "".
    pub fn redo(&mut self) -> String {
        let Some((description, state)) = self.journal.redo() else {
            return String::new();
        };
        self.state = state.clone();
        self.everything_changed();
        self.modified = true;
        tracing::debug!("Redid '{}'", description);
        description
    }

    pub fn can_undo(&self) -> bool {
        self.journal.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.journal.can_redo()
    }

    pub fn undo_description(&self) -> &str {
        self.journal.undo_description()
    }

    pub fn redo_description(&self) -> &str {
        self.journal.redo_description()
    }

    pub fn max_undo_steps(&self) -> usize {
        self.journal.max_steps()
    }

    pub fn set_max_undo_steps(&mut self, max_steps: usize) {
        self.journal.set_max_steps(max_steps);
        tracing::debug!(
            "Undo depth set to {} ({} steps kept)",
            max_steps,
            self.journal.undo_len()
        );
    }

    /// Number of steps that can currently be undone.
    pub fn undo_steps(&self) -> usize {
        self.journal.undo_len()
    }

    /// Whether anything changed since the project was created, loaded or
    /// last saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::project;
    use crate::models::Match;

    #[test]
    fn undo_restores_snapshot() {
        let mut project = project(10);
        project.set_match(3, Match::N).unwrap();
        project.commit("Set match");
        project.set_decimated(4, true).unwrap();
        project.commit("Decimate");

        assert_eq!(project.undo_description(), "Decimate");
        assert_eq!(project.undo(), "Decimate");
        assert!(!project.is_decimated(4).unwrap());
        assert_eq!(project.output_frame_count(), 10);

        assert_eq!(project.undo(), "Set match");
        assert_eq!(project.get_match(3).unwrap(), Match::C);
        assert_eq!(project.undo(), "");

        assert_eq!(project.redo(), "Set match");
        assert_eq!(project.redo(), "Decimate");
        assert_eq!(project.output_frame_count(), 9);
        assert_eq!(project.redo(), "");
    }

    #[test]
    fn undo_refreshes_orphans() {
        let mut project = project(10);
        project
            .set_range_matches_from_pattern(0, 9, "cccnn")
            .unwrap();
        project.commit("Pattern");
        project.set_decimated(4, true).unwrap();
        project.commit("Decimate");
        assert_eq!(project.orphan_fields().len(), 1);

        project.undo();
        assert!(project.orphan_fields().is_empty());
    }

    #[test]
    fn unchanged_state_is_not_committed() {
        let mut project = project(10);
        project.set_match(2, Match::N).unwrap();
        project.commit("Set match");
        project.commit("Nothing");
        assert_eq!(project.undo_steps(), 1);
        assert_eq!(project.undo_description(), "Set match");

        // back to the committed state by hand
        project.set_match(2, Match::C).unwrap();
        project.set_match(2, Match::N).unwrap();
        project.commit("Round trip");
        assert_eq!(project.undo_steps(), 1);
    }

    #[test]
    fn clear_history_keeps_state() {
        let mut project = project(10);
        project.set_decimated(4, true).unwrap();
        project.commit("Decimate");
        project.set_match(1, Match::B).unwrap();
        project.commit("Set match");
        project.undo();
        assert!(project.can_redo());

        project.clear_history();
        assert!(!project.can_undo());
        assert!(!project.can_redo());
        assert_eq!(project.undo(), "");
        assert!(project.is_decimated(4).unwrap());
        assert_eq!(project.get_match(1).unwrap(), Match::C);

        project.set_max_undo_steps(5);
        project.set_match(1, Match::N).unwrap();
        project.commit("Set match");
        assert_eq!(project.undo_steps(), 1);
    }

    #[test]
    fn modified_flag() {
        let mut project = project(10);
        assert!(!project.is_modified());
        project.set_match(1, Match::P).unwrap();
        project.commit("Set match");
        assert!(project.is_modified());
        project.mark_saved();
        assert!(!project.is_modified());
        project.undo();
        assert!(project.is_modified());
    }
}
