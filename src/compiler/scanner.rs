use super::Compiler;
use crate::alphabet::TrackPair;
use crate::ident::IdentGenerator;
use crate::role::{Bottom, HeadRole, Top};
use crate::types::{CompileError, Direction, State, Symbol};
use std::collections::HashMap;
use tracing::{debug, info};

/// A source state together with the symbols under both heads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimulatedState {
    pub state: State,
    pub top: Symbol,
    pub bottom: Symbol,
}

impl SimulatedState {
    pub fn new(state: &str, pair: TrackPair) -> Self {
        Self {
            state: state.to_string(),
            top: pair.top,
            bottom: pair.bottom,
        }
    }
}

/// Resolve-or-create memo of compiled states standing for [`SimulatedState`]s.
///
/// Entries keep their creation order, which makes every pass over them deterministic.
#[derive(Debug, Clone, Default)]
pub struct SimulatedStates {
    index: HashMap<SimulatedState, usize>,
    entries: Vec<(SimulatedState, State)>,
}

impl SimulatedStates {
    /// Returns the compiled state of `key`, allocating it on first use.
    pub fn resolve(&mut self, key: SimulatedState, names: &mut IdentGenerator) -> State {
        if let Some(&i) = self.index.get(&key) {
            return self.entries[i].1.clone();
        }

        let alias = names.fresh_hinted(&format!("{}-{}-{}", key.state, key.top, key.bottom));
        debug!(state = %key.state, top = %key.top, bottom = %key.bottom, alias = %alias, "Simulated state created");
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, alias.clone()));
        alias
    }

    pub fn get(&self, state: &str, top: &str, bottom: &str) -> Option<&State> {
        let key = SimulatedState::new(state, TrackPair::new(top, bottom));
        self.index.get(&key).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SimulatedState, &State)> {
        self.entries.iter().map(|(key, alias)| (key, alias))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Compiler<'_> {
    /// Emits the scanning sweeps of every aliased state.
    ///
    /// From `scan_entry` the head moves right over unmarked cells. A cell holding both heads
    /// resolves the simulated state at once. A cell holding one head remembers its symbol in
    /// a per-symbol state and keeps sweeping until the other head's marker is found. The head
    /// is left on the cell where the scan ended.
    pub(super) fn program_scanning(&mut self) -> Result<SimulatedStates, CompileError> {
        let mut simulated = SimulatedStates::default();
        let aliases: Vec<_> = self
            .aliases
            .iter()
            .map(|(state, alias)| (state.clone(), alias.scan_entry.clone()))
            .collect();

        for (state, entry) in &aliases {
            for (pair, cell) in self.alphabet.pairs() {
                self.table
                    .pass(entry, &cell.no_head, entry, Direction::Right)?;
                let found =
                    simulated.resolve(SimulatedState::new(state, pair.clone()), &mut self.names);
                self.table
                    .pass(entry, &cell.both_heads, &found, Direction::Stay)?;
            }

            self.program_scanning_for::<Top>(state, entry, &mut simulated)?;
            self.program_scanning_for::<Bottom>(state, entry, &mut simulated)?;
        }

        info!(
            simulated_states = simulated.len(),
            transitions = self.table.len(),
            "Scanning engine emitted"
        );
        Ok(simulated)
    }

    /// Emits the part of the scan where `H`'s marker is found first.
    fn program_scanning_for<H: HeadRole>(
        &mut self,
        state: &str,
        entry: &str,
        simulated: &mut SimulatedStates,
    ) -> Result<(), CompileError> {
        let letters = self.alphabet.letters().to_vec();

        for letter in &letters {
            let found = self
                .names
                .fresh_hinted(&format!("{state}-{}-{letter}", H::NAME));

            for other in &letters {
                let cell = self.alphabet.get(&H::pair(letter, other))?;
                self.table
                    .pass(entry, H::this_marker(cell), &found, Direction::Right)?;
            }

            for (pair, cell) in self.alphabet.pairs() {
                self.table
                    .pass(&found, &cell.no_head, &found, Direction::Right)?;

                let key = SimulatedState::new(state, H::pair(letter, H::other_of(pair)));
                let resolved = simulated.resolve(key, &mut self.names);
                self.table
                    .pass(&found, H::other_marker(cell), &resolved, Direction::Stay)?;
            }
        }

        Ok(())
    }
}
