//! Snapshot journal.
//!
//! The journal holds the state after every committed step plus the state
//! it started from. The cursor points at the snapshot matching the live
//! state; undo and redo move it and hand back the snapshot to restore.

use std::collections::VecDeque;

pub const DEFAULT_MAX_STEPS: usize = 1000;

#[derive(Debug, Clone)]
struct Step<T> {
    description: String,
    state: T,
}

#[derive(Debug, Clone)]
pub struct UndoJournal<T: Clone> {
    steps: VecDeque<Step<T>>,
    cursor: usize,
    max_steps: usize,
}

impl<T: Clone> UndoJournal<T> {
    pub fn new(initial: T, max_steps: usize) -> Self {
        let mut steps = VecDeque::new();
        steps.push_back(Step {
            description: String::new(),
            state: initial,
        });
        Self {
            steps,
            cursor: 0,
            max_steps,
        }
    }

    /// Forget all history and start over from `state`.
    pub fn reset(&mut self, state: T) {
        *self = Self::new(state, self.max_steps);
    }

    /// Record `state` as the result of a step called `description`.
    ///
    /// Discards anything that could have been redone.
    pub fn commit(&mut self, description: &str, state: T) {
        self.steps.truncate(self.cursor + 1);
        self.steps.push_back(Step {
            description: description.to_string(),
            state,
        });
        self.cursor += 1;
        self.evict();
        tracing::trace!("Committed undo step '{}'", description);
    }

    fn evict(&mut self) {
        while self.steps.len() > self.max_steps + 1 && self.cursor > 0 {
            self.steps.pop_front();
            self.cursor -= 1;
        }
    }

    /// Step back. Returns the undone step's description and the state to
    /// restore.
    pub fn undo(&mut self) -> Option<(String, &T)> {
        if self.cursor == 0 {
            return None;
        }
        let description = self.steps[self.cursor].description.clone();
        self.cursor -= 1;
        Some((description, &self.steps[self.cursor].state))
    }

    /// Step forward. Returns the redone step's description and the state to
    /// restore.
    pub fn redo(&mut self) -> Option<(String, &T)> {
        if self.cursor + 1 >= self.steps.len() {
            return None;
        }
        self.cursor += 1;
        let step = &self.steps[self.cursor];
        Some((step.description.clone(), &step.state))
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.steps.len()
    }

    /// Description of the step `undo` would revert, or "".
    pub fn undo_description(&self) -> &str {
        if self.cursor == 0 {
            return "";
        }
        &self.steps[self.cursor].description
    }

    /// Description of the step `redo` would reapply, or "".
    pub fn redo_description(&self) -> &str {
        self.steps
            .get(self.cursor + 1)
            .map(|step| step.description.as_str())
            .unwrap_or("")
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Change the depth, evicting the oldest steps if needed.
    pub fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
        self.evict();
    }

    /// Number of steps that can be undone.
    pub fn undo_len(&self) -> usize {
        self.cursor
    }

    /// The snapshot matching the live state.
    pub fn current(&self) -> &T {
        &self.steps[self.cursor].state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_walk() {
        let mut journal = UndoJournal::new(0, 10);
        journal.commit("one", 1);
        journal.commit("two", 2);

        assert_eq!(journal.undo_description(), "two");
        assert_eq!(journal.undo(), Some(("two".to_string(), &1)));
        assert_eq!(journal.redo_description(), "two");
        assert_eq!(journal.undo(), Some(("one".to_string(), &0)));
        assert_eq!(journal.undo(), None);
        assert_eq!(journal.undo_description(), "");

        assert_eq!(journal.redo(), Some(("one".to_string(), &1)));
        assert_eq!(journal.redo(), Some(("two".to_string(), &2)));
        assert_eq!(journal.redo(), None);
        assert_eq!(journal.redo_description(), "");
    }

    #[test]
    fn commit_truncates_redo() {
        let mut journal = UndoJournal::new(0, 10);
        journal.commit("one", 1);
        journal.commit("two", 2);
        journal.undo();
        journal.commit("three", 3);

        assert!(!journal.can_redo());
        assert_eq!(journal.undo(), Some(("three".to_string(), &1)));
        assert_eq!(journal.redo(), Some(("three".to_string(), &3)));
    }

    #[test]
    fn eviction_keeps_newest_steps() {
        let mut journal = UndoJournal::new(0, 3);
        for i in 1..=5 {
            journal.commit(&format!("step {}", i), i);
        }
        assert_eq!(journal.undo_len(), 3);

        let mut undone = Vec::new();
        while let Some((description, _)) = journal.undo() {
            undone.push(description);
        }
        assert_eq!(undone, vec!["step 5", "step 4", "step 3"]);
        assert_eq!(journal.current(), &2);
    }

    #[test]
    fn shrinking_depth_evicts() {
        let mut journal = UndoJournal::new(0, 10);
        for i in 1..=5 {
            journal.commit("x", i);
        }
        journal.set_max_steps(2);
        assert_eq!(journal.undo_len(), 2);
        assert_eq!(journal.max_steps(), 2);
    }
}
