//! This module provides functions for analyzing machine descriptions to detect structural errors
//! and inconsistencies before compilation or execution. This includes checks for declared states
//! and symbols, consistent track counts, and deterministic transition rules.

use crate::types::{Machine, TuringMachineError};
use std::collections::HashSet;
use tracing::warn;

/// Represents various errors that can be found during the analysis of a machine description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that the blank symbol is missing from the tape alphabet, or is an input symbol.
    InvalidBlank(String),
    /// Indicates input symbols that are not part of the tape alphabet.
    InvalidInputSymbols(Vec<String>),
    /// Indicates that one of the distinguished states is not declared.
    UndeclaredState(String),
    /// Indicates that the accepting and rejecting states coincide.
    AmbiguousVerdict(String),
    /// Indicates that transitions reference states that are not declared.
    UndefinedStates(Vec<String>),
    /// Indicates that transitions read or write symbols outside the tape alphabet.
    UndefinedSymbols(Vec<String>),
    /// Indicates two transitions of one state reading the same symbols.
    NondeterministicTransitions(Vec<String>),
    /// Indicates structural problems with the machine (no tracks, mismatched arity, etc.).
    StructuralError(String),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidBlank(blank) => {
                TuringMachineError::ValidationError(format!("Invalid blank symbol: {}", blank))
            }
            AnalysisError::InvalidInputSymbols(symbols) => TuringMachineError::ValidationError(
                format!("Input symbols missing from the tape alphabet: {:?}", symbols),
            ),
            AnalysisError::UndeclaredState(state) => {
                TuringMachineError::ValidationError(format!("Undeclared state: {}", state))
            }
            AnalysisError::AmbiguousVerdict(state) => TuringMachineError::ValidationError(
                format!("State {} is both accepting and rejecting", state),
            ),
            AnalysisError::UndefinedStates(states) => TuringMachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", states),
            ),
            AnalysisError::UndefinedSymbols(symbols) => TuringMachineError::ValidationError(
                format!("Transitions use symbols outside the alphabet: {:?}", symbols),
            ),
            AnalysisError::NondeterministicTransitions(transitions) => {
                TuringMachineError::ValidationError(format!(
                    "Multiple transitions for the same symbols: {:?}",
                    transitions
                ))
            }
            AnalysisError::StructuralError(msg) => TuringMachineError::ValidationError(msg),
        }
    }
}

/// Analyzes a given `Machine` for structural and logical errors.
///
/// States unreachable from the initial state are legal and only reported through a warning.
///
/// # Arguments
///
/// * `machine` - A reference to the `Machine` to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` with the first violated rule otherwise.
pub fn analyze(machine: &Machine) -> Result<(), TuringMachineError> {
    let first_error = [
        check_structure,
        check_alphabet,
        check_distinguished_states,
        check_transition_states,
        check_transition_symbols,
        check_determinism,
    ]
    .iter()
    .find_map(|f| f(machine).err());

    if let Some(error) = first_error {
        return Err(error.into());
    }

    let unreachable = unreachable_states(machine);
    if !unreachable.is_empty() {
        warn!(machine = %machine.name, states = ?unreachable, "Unreachable states detected");
    }

    Ok(())
}

/// Checks that the machine has tracks and that every transition covers all of them.
fn check_structure(machine: &Machine) -> Result<(), AnalysisError> {
    if machine.tracks == 0 {
        return Err(AnalysisError::StructuralError(
            "No tracks defined".to_string(),
        ));
    }

    for (state, transitions) in &machine.rules {
        for transition in transitions {
            if transition.read.len() != machine.tracks
                || transition.write.len() != machine.tracks
                || transition.directions.len() != machine.tracks
            {
                return Err(AnalysisError::StructuralError(format!(
                    "Transition in state '{}' has inconsistent track counts",
                    state
                )));
            }
        }
    }

    Ok(())
}

/// Checks that the blank is a tape symbol but not an input symbol, and that every input symbol
/// is a tape symbol.
fn check_alphabet(machine: &Machine) -> Result<(), AnalysisError> {
    if !machine.alphabet.contains(&machine.blank) || machine.input_alphabet.contains(&machine.blank)
    {
        return Err(AnalysisError::InvalidBlank(machine.blank.clone()));
    }

    let missing: Vec<String> = machine
        .input_alphabet
        .iter()
        .filter(|symbol| !machine.alphabet.contains(symbol))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::InvalidInputSymbols(missing));
    }

    Ok(())
}

/// Checks that the initial, accepting and rejecting states are declared and that the verdict
/// states differ.
///
/// The initial state may coincide with either verdict state; such a machine halts at once.
fn check_distinguished_states(machine: &Machine) -> Result<(), AnalysisError> {
    for state in [
        &machine.initial_state,
        &machine.accept_state,
        &machine.reject_state,
    ] {
        if !machine.states.contains(state) {
            return Err(AnalysisError::UndeclaredState(state.clone()));
        }
    }

    if machine.accept_state == machine.reject_state {
        return Err(AnalysisError::AmbiguousVerdict(machine.accept_state.clone()));
    }

    Ok(())
}

/// Checks that every transition starts and ends in a declared state.
fn check_transition_states(machine: &Machine) -> Result<(), AnalysisError> {
    let declared: HashSet<&String> = machine.states.iter().collect();

    let mut undefined = Vec::new();
    for (state, transitions) in &machine.rules {
        if !declared.contains(state) {
            undefined.push(state.clone());
        }
        for (i, transition) in transitions.iter().enumerate() {
            if !declared.contains(&transition.next_state) {
                undefined.push(format!("{}[{}] -> {}", state, i, transition.next_state));
            }
        }
    }

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

/// Checks that every symbol read or written by a transition belongs to the tape alphabet.
fn check_transition_symbols(machine: &Machine) -> Result<(), AnalysisError> {
    let alphabet: HashSet<&String> = machine.alphabet.iter().collect();

    let mut undefined: Vec<String> = machine
        .rules
        .values()
        .flatten()
        .flat_map(|transition| transition.read.iter().chain(&transition.write))
        .filter(|symbol| !alphabet.contains(symbol))
        .cloned()
        .collect();

    if !undefined.is_empty() {
        undefined.sort(); // Sort for deterministic output
        undefined.dedup();
        return Err(AnalysisError::UndefinedSymbols(undefined));
    }

    Ok(())
}

/// Checks that no state has two transitions reading the same symbols.
fn check_determinism(machine: &Machine) -> Result<(), AnalysisError> {
    let mut duplicates = Vec::new();

    for (state, transitions) in &machine.rules {
        let mut seen = HashSet::new();
        for transition in transitions {
            if !seen.insert(&transition.read) {
                duplicates.push(format!("{} {:?}", state, transition.read));
            }
        }
    }

    if !duplicates.is_empty() {
        return Err(AnalysisError::NondeterministicTransitions(duplicates));
    }

    Ok(())
}

/// Collects the declared states that cannot be reached from the initial state, using a
/// depth-first traversal of the transition graph.
fn unreachable_states(machine: &Machine) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut queue = vec![machine.initial_state.clone()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state.clone()) {
            continue;
        }

        if let Some(transitions) = machine.rules.get(&state) {
            for transition in transitions {
                if !visited.contains(&transition.next_state) {
                    queue.push(transition.next_state.clone());
                }
            }
        }
    }

    let mut unreachable: Vec<String> = machine
        .states
        .iter()
        .filter(|state| !visited.contains(*state) && !machine.is_terminal(state))
        .cloned()
        .collect();
    unreachable.sort();
    unreachable
}
