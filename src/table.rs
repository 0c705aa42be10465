//! The single-track transition table accumulated by the compiler.

use crate::types::{CompileError, Direction, State, Symbol, Transition};
use std::collections::{BTreeMap, BTreeSet};

/// What a single-track machine does in one state on one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub next_state: State,
    pub write: Symbol,
    pub direction: Direction,
}

/// Write-once map from `(state, symbol)` to [`Action`].
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    entries: BTreeMap<(State, Symbol), Action>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the transition taken in `state` when reading `read`.
    ///
    /// # Returns
    ///
    /// * `Err(CompileError::DuplicateTransition)` if `(state, read)` already has a transition.
    pub fn insert(
        &mut self,
        state: &str,
        read: &str,
        next_state: &str,
        write: &str,
        direction: Direction,
    ) -> Result<(), CompileError> {
        let key = (state.to_string(), read.to_string());
        if self.entries.contains_key(&key) {
            return Err(CompileError::DuplicateTransition {
                state: key.0,
                symbol: key.1,
            });
        }

        self.entries.insert(
            key,
            Action {
                next_state: next_state.to_string(),
                write: write.to_string(),
                direction,
            },
        );
        Ok(())
    }

    /// Registers a transition that leaves the cell unchanged.
    pub fn pass(
        &mut self,
        state: &str,
        read: &str,
        next_state: &str,
        direction: Direction,
    ) -> Result<(), CompileError> {
        self.insert(state, read, next_state, read, direction)
    }

    pub fn get(&self, state: &str, read: &str) -> Option<&Action> {
        self.entries.get(&(state.to_string(), read.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every state mentioned as a source or a target.
    pub fn states(&self) -> BTreeSet<State> {
        self.entries
            .iter()
            .flat_map(|((state, _), action)| [state.clone(), action.next_state.clone()])
            .collect()
    }

    /// Converts the table into the one-track rules of a [`crate::types::Machine`].
    pub fn into_rules(self) -> BTreeMap<State, Vec<Transition>> {
        let mut rules: BTreeMap<State, Vec<Transition>> = BTreeMap::new();
        for ((state, read), action) in self.entries {
            rules.entry(state).or_default().push(Transition {
                read: vec![read],
                write: vec![action.write],
                directions: vec![action.direction],
                next_state: action.next_state,
            });
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut table = TransitionTable::new();
        table.insert("q", "a", "r", "b", Direction::Right).unwrap();

        let action = table.get("q", "a").unwrap();
        assert_eq!(action.next_state, "r");
        assert_eq!(action.write, "b");
        assert_eq!(action.direction, Direction::Right);
        assert!(table.get("q", "b").is_none());
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut table = TransitionTable::new();
        table.pass("q", "a", "q", Direction::Left).unwrap();

        let error = table.insert("q", "a", "r", "b", Direction::Right).unwrap_err();
        assert_eq!(
            error,
            CompileError::DuplicateTransition {
                state: "q".to_string(),
                symbol: "a".to_string(),
            }
        );
        // The first registration survives.
        assert_eq!(table.get("q", "a").unwrap().next_state, "q");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_into_rules_groups_by_state() {
        let mut table = TransitionTable::new();
        table.pass("q", "a", "q", Direction::Right).unwrap();
        table.pass("q", "b", "r", Direction::Stay).unwrap();
        table.insert("r", "b", "s", "c", Direction::Left).unwrap();

        assert_eq!(
            table.states().into_iter().collect::<Vec<_>>(),
            vec!["q", "r", "s"]
        );

        let rules = table.into_rules();
        assert_eq!(rules["q"].len(), 2);
        assert_eq!(
            rules["r"][0],
            Transition {
                read: vec!["b".to_string()],
                write: vec!["c".to_string()],
                directions: vec![Direction::Left],
                next_state: "s".to_string(),
            }
        );
    }
}
