use crate::ident::IdentGenerator;
use crate::types::{CompileError, Machine, State};
use std::collections::BTreeMap;

/// The two compiled states standing for one non-terminal source state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEncoding {
    /// Sweeps right from the first cell looking for both head markers.
    pub scan_entry: State,
    /// Sweeps left back to the tape start, then enters `scan_entry`.
    pub return_sweep: State,
}

/// Maps every non-terminal source state to its [`StateEncoding`].
///
/// Accepting and rejecting states have no entry: reaching them ends the simulation, so the
/// compiled machine jumps straight to the source names.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: BTreeMap<State, StateEncoding>,
}

impl AliasTable {
    /// Allocates the aliases. The initial state scans from `semi_start`, the state the setup
    /// protocol ends in.
    pub fn build(source: &Machine, semi_start: &str, names: &mut IdentGenerator) -> Self {
        let mut entries = BTreeMap::new();

        for state in &source.states {
            if source.is_terminal(state) || entries.contains_key(state) {
                continue;
            }

            let scan_entry = if *state == source.initial_state {
                semi_start.to_string()
            } else {
                names.fresh_hinted(&format!("{state}-start-scanning"))
            };
            let return_sweep = names.fresh_hinted(&format!("{state}-going-back"));

            entries.insert(
                state.clone(),
                StateEncoding {
                    scan_entry,
                    return_sweep,
                },
            );
        }

        Self { entries }
    }

    pub fn get(&self, state: &str) -> Result<&StateEncoding, CompileError> {
        self.entries
            .get(state)
            .ok_or_else(|| CompileError::MissingLookup {
                table: "state alias",
                key: state.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, &StateEncoding)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
