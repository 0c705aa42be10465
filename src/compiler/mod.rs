//! Compiles a dual-track Turing Machine into an equivalent single-track one.
//!
//! The compiled machine keeps both tracks in one tape by encoding every cell as a pair of
//! source symbols plus a marker for the heads sitting on it. One step of the source machine
//! becomes a macro-step of the compiled one:
//!
//! 1. sweep right from the left sentinel until both head markers are found, arriving in a
//!    state that knows the source state and both symbols under the heads;
//! 2. rewrite and move each head marker as the source transition dictates;
//! 3. sweep back to the left sentinel in the scanning state of the next source state.
//!
//! The phases below run once each, in this order, appending to a single transition table.

mod aliases;
mod cleanup;
mod relocation;
mod scanner;
mod setup;

pub use aliases::{AliasTable, StateEncoding};
pub use relocation::SimulatedTransition;
pub use scanner::{SimulatedState, SimulatedStates};

use crate::alphabet::EncodedAlphabet;
use crate::analyzer::analyze;
use crate::ident::IdentGenerator;
use crate::table::TransitionTable;
use crate::types::{Machine, State, TuringMachineError};
use std::collections::BTreeSet;
use tracing::info;

/// The outcome of compiling a dual-track machine.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// The single-track machine.
    pub machine: Machine,
    /// The encoded alphabet the compiled tape is written in.
    pub alphabet: EncodedAlphabet,
    /// Scanning and return-sweep states of every non-terminal source state.
    pub aliases: AliasTable,
    /// Every simulated state the scanning phase resolved.
    pub simulated: SimulatedStates,
    /// Number of distinct decoded source transitions that got relocation machinery.
    pub relocations: usize,
}

/// Validates `source` and compiles it into a single-track machine.
///
/// # Returns
///
/// * `Ok(Compilation)` with the compiled machine and the tables used to build it.
/// * `Err(TuringMachineError::ValidationError)` if `source` is malformed or not dual-track.
/// * `Err(TuringMachineError::Compile)` if the construction hit an internal defect.
pub fn compile(source: &Machine) -> Result<Compilation, TuringMachineError> {
    analyze(source)?;
    if source.tracks != 2 {
        return Err(TuringMachineError::ValidationError(format!(
            "Expected a dual-track machine, got {} track(s)",
            source.tracks
        )));
    }

    let mut compiler = Compiler::new(source);
    compiler.program_setup()?;
    let simulated = compiler.program_scanning()?;
    let relocations = compiler.program_transitions(&simulated)?;
    compiler.program_cleanup()?;

    Ok(compiler.finish(simulated, relocations))
}

/// Owns everything mutated during one compilation.
struct Compiler<'a> {
    source: &'a Machine,
    names: IdentGenerator,
    alphabet: EncodedAlphabet,
    aliases: AliasTable,
    table: TransitionTable,
}

impl<'a> Compiler<'a> {
    /// Synthesizes the encoded alphabet and the state aliases.
    fn new(source: &'a Machine) -> Self {
        let mut letters = IdentGenerator::new(source.alphabet.iter().cloned());
        let alphabet = EncodedAlphabet::build(&source.alphabet, &source.blank, &mut letters);

        let mut names = IdentGenerator::new(
            source
                .states
                .iter()
                .chain([
                    &source.initial_state,
                    &source.accept_state,
                    &source.reject_state,
                ])
                .cloned(),
        );
        let semi_start = names.fresh_hinted("semi-start");
        let aliases = AliasTable::build(source, &semi_start, &mut names);

        info!(
            machine = %source.name,
            letters = source.alphabet.len(),
            symbols = alphabet.size(),
            aliased_states = aliases.len(),
            "Encoded alphabet and state aliases synthesized"
        );

        Self {
            source,
            names,
            alphabet,
            aliases,
            table: TransitionTable::new(),
        }
    }

    /// Wraps the table into the single-track result machine.
    fn finish(self, simulated: SimulatedStates, relocations: usize) -> Compilation {
        let source = self.source;

        let mut alphabet = vec![source.blank.clone()];
        alphabet.extend(
            source
                .input_alphabet
                .iter()
                .filter(|symbol| **symbol != source.blank)
                .cloned(),
        );
        alphabet.extend(self.alphabet.symbols());

        let mut states: BTreeSet<State> = self.table.states();
        states.insert(source.initial_state.clone());
        states.insert(source.accept_state.clone());
        states.insert(source.reject_state.clone());

        info!(
            machine = %source.name,
            states = states.len(),
            transitions = self.table.len(),
            simulated_states = simulated.len(),
            relocations,
            "Compilation finished"
        );

        let machine = Machine {
            name: format!("{} (single-track)", source.name),
            tracks: 1,
            mode: source.mode.clone(),
            blank: source.blank.clone(),
            input_alphabet: source.input_alphabet.clone(),
            alphabet,
            states: states.into_iter().collect(),
            initial_state: source.initial_state.clone(),
            accept_state: source.accept_state.clone(),
            reject_state: source.reject_state.clone(),
            rules: self.table.into_rules(),
        };

        Compilation {
            machine,
            alphabet: self.alphabet,
            aliases: self.aliases,
            simulated,
            relocations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction::{Left, Right, Stay};
    use std::collections::HashSet;

    fn accept_zero() -> Machine {
        Machine::new("Accept Zero", 2, "_")
            .with_input(&["0"])
            .with_states("I", "Accept", "Reject")
            .rule("I", &["0", "_"], &["0", "_"], &[Stay, Stay], "Accept")
    }

    fn mover() -> Machine {
        Machine::new("Mover", 2, "_")
            .with_input(&["a", "b"])
            .rule("start", &["a", "_"], &["b", "a"], &[Right, Left], "next")
            .rule("start", &["b", "_"], &["b", "a"], &[Right, Left], "next")
            .rule("next", &["_", "a"], &["_", "a"], &[Stay, Stay], "accept")
    }

    #[test]
    fn test_alphabet_of_result_machine() {
        let compilation = compile(&accept_zero()).unwrap();
        let machine = &compilation.machine;

        // 4 * |{_, 0}|^2 encoded symbols, two sentinels, the raw blank and the input symbol.
        assert_eq!(compilation.alphabet.size(), 4 * 4 + 2);
        assert_eq!(machine.alphabet.len(), 4 * 4 + 2 + 2);
        assert_eq!(machine.input_alphabet, vec!["0"]);
        assert_eq!(machine.tracks, 1);
        for symbol in compilation.alphabet.symbols() {
            assert!(machine.alphabet.contains(&symbol));
        }
    }

    #[test]
    fn test_every_read_symbol_is_in_the_alphabet() {
        let compilation = compile(&mover()).unwrap();
        let machine = &compilation.machine;
        let alphabet: HashSet<_> = machine.alphabet.iter().collect();
        assert!(analyze(machine).is_ok());

        for transitions in machine.rules.values() {
            for transition in transitions {
                assert!(alphabet.contains(&transition.read[0]));
                assert!(alphabet.contains(&transition.write[0]));
                assert!(machine.states.contains(&transition.next_state));
            }
        }
    }

    #[test]
    fn test_terminal_states_keep_their_names() {
        let compilation = compile(&accept_zero()).unwrap();
        let machine = &compilation.machine;

        assert_eq!(machine.initial_state, "I");
        assert_eq!(machine.accept_state, "Accept");
        assert_eq!(machine.reject_state, "Reject");
        assert!(compilation.aliases.get("Accept").is_err());
        assert!(compilation.aliases.get("Reject").is_err());
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let first = compile(&mover()).unwrap();
        let second = compile(&mover()).unwrap();

        assert_eq!(first.machine, second.machine);
        assert_eq!(first.simulated.len(), second.simulated.len());
    }

    #[test]
    fn test_rejects_single_track_machines() {
        let machine = Machine::new("Single", 1, "_").with_input(&["a"]).rule(
            "start",
            &["a"],
            &["a"],
            &[Right],
            "accept",
        );

        let error = compile(&machine).unwrap_err();
        assert!(matches!(error, TuringMachineError::ValidationError(_)));
        assert!(error.to_string().contains("dual-track"));
    }

    #[test]
    fn test_rejects_malformed_machines() {
        let machine = Machine::new("Bad", 2, "_").with_input(&["a"]).rule(
            "start",
            &["a", "z"],
            &["a", "a"],
            &[Right, Right],
            "accept",
        );

        assert!(matches!(
            compile(&machine),
            Err(TuringMachineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_start_state_that_is_terminal() {
        let machine = Machine::new("Instant", 2, "_")
            .with_input(&["a"])
            .with_states("done", "done", "no");

        let compilation = compile(&machine).unwrap();
        assert!(compilation.machine.rules.is_empty());
        assert_eq!(compilation.machine.initial_state, "done");
        assert_eq!(compilation.aliases.len(), 0);
    }
}
