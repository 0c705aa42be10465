//! This module defines the core data structures and types shared by the compiler and the
//! simulator: the machine description used for both dual-track sources and single-track
//! results, transitions, execution outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A tape symbol. Source symbols are usually one character long; synthesized symbols
/// carry a parenthesised, human-readable provenance such as `(a_H-b)`.
pub type Symbol = String;
/// A control state identifier.
pub type State = String;

/// The default blank symbol used on the tracks.
pub const DEFAULT_BLANK_SYMBOL: &str = "_";
/// The maximum number of steps to execute before `run` gives up.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// Describes a Turing Machine with one tape split into `tracks` parallel tracks, each with
/// its own head.
///
/// The same representation describes the dual-track machines accepted by the compiler and
/// the single-track machines it produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Machine {
    /// The name of the machine.
    pub name: String,
    /// Number of tracks, each read and written by its own head.
    pub tracks: usize,
    /// Execution mode of the simulator.
    pub mode: Mode,
    /// The blank symbol filling every unwritten cell.
    pub blank: Symbol,
    /// Symbols an input word may consist of. Never contains the blank.
    pub input_alphabet: Vec<Symbol>,
    /// The full tape alphabet, blank and input symbols included.
    pub alphabet: Vec<Symbol>,
    /// Every control state, in declaration order.
    pub states: Vec<State>,
    /// The state the machine starts in.
    pub initial_state: State,
    /// Reaching this state halts with acceptance.
    pub accept_state: State,
    /// Reaching this state halts with rejection.
    pub reject_state: State,
    /// Transition rules grouped by their source state.
    pub rules: BTreeMap<State, Vec<Transition>>,
}

/// The execution mode for a Turing Machine.
///
/// Controls how the simulator handles undefined transitions:
/// - `Normal` (default): undefined transitions reject the input.
/// - `Strict`: undefined transitions trigger an error, useful for catching missing rules.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mode {
    /// Undefined transitions reject.
    #[default]
    Normal,
    /// Undefined transitions are treated as errors.
    Strict,
}

impl Machine {
    /// Creates an empty machine with `start`, `accept` and `reject` as its distinguished
    /// states and `blank` as its only tape symbol.
    pub fn new(name: &str, tracks: usize, blank: &str) -> Self {
        let mut machine = Self {
            name: name.to_string(),
            tracks,
            mode: Mode::default(),
            blank: blank.to_string(),
            input_alphabet: Vec::new(),
            alphabet: vec![blank.to_string()],
            states: Vec::new(),
            initial_state: "start".to_string(),
            accept_state: "accept".to_string(),
            reject_state: "reject".to_string(),
            rules: BTreeMap::new(),
        };
        for state in ["start", "accept", "reject"] {
            machine.add_state(state);
        }
        machine
    }

    /// Declares the input alphabet. Input symbols are added to the tape alphabet as well.
    pub fn with_input(mut self, symbols: &[&str]) -> Self {
        for symbol in symbols {
            if !self.input_alphabet.iter().any(|s| s == symbol) {
                self.input_alphabet.push(symbol.to_string());
            }
            self.add_symbol(symbol);
        }
        self
    }

    /// Declares additional working symbols that may appear on the tape but not in the input.
    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        for symbol in symbols {
            self.add_symbol(symbol);
        }
        self
    }

    /// Renames the initial, accepting and rejecting states. Call before adding rules, as the
    /// declared state list is reset.
    pub fn with_states(mut self, initial: &str, accept: &str, reject: &str) -> Self {
        self.states.clear();
        self.initial_state = initial.to_string();
        self.accept_state = accept.to_string();
        self.reject_state = reject.to_string();
        for state in [initial, accept, reject] {
            self.add_state(state);
        }
        self
    }

    /// Sets the execution mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds a rule, declaring both of its states if they are new.
    pub fn rule(
        mut self,
        state: &str,
        read: &[&str],
        write: &[&str],
        directions: &[Direction],
        next_state: &str,
    ) -> Self {
        self.add_state(state);
        self.add_state(next_state);
        self.rules
            .entry(state.to_string())
            .or_default()
            .push(Transition {
                read: read.iter().map(|s| s.to_string()).collect(),
                write: write.iter().map(|s| s.to_string()).collect(),
                directions: directions.to_vec(),
                next_state: next_state.to_string(),
            });
        self
    }

    fn add_state(&mut self, state: &str) {
        if !self.states.iter().any(|s| s == state) {
            self.states.push(state.to_string());
        }
    }

    fn add_symbol(&mut self, symbol: &str) {
        if !self.alphabet.iter().any(|s| s == symbol) {
            self.alphabet.push(symbol.to_string());
        }
    }

    /// Returns `true` for the accepting and rejecting states.
    pub fn is_terminal(&self, state: &str) -> bool {
        state == self.accept_state || state == self.reject_state
    }

    /// Finds the transition taken in `state` when the heads read `symbols`.
    pub fn transition(&self, state: &str, symbols: &[Symbol]) -> Option<&Transition> {
        self.rules
            .get(state)?
            .iter()
            .find(|t| t.read.as_slice() == symbols)
    }

    /// Total number of transitions across all states.
    pub fn transition_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

/// Represents a single transition rule.
///
/// A transition defines how the machine behaves when it is in a certain state
/// and its heads read specific symbols, one per track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Symbols to be read, one per track.
    pub read: Vec<Symbol>,
    /// Symbols to be written, one per track.
    pub write: Vec<Symbol>,
    /// Direction each head moves after writing.
    pub directions: Vec<Direction>,
    /// The next state the machine transitions to.
    pub next_state: State,
}

/// Represents the possible directions a head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Orders moves by how far right they leave the head: `Left < Stay < Right`.
    pub fn reach(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Stay => 0,
            Direction::Right => 1,
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a step (or ran out of budget) and can continue.
    Continue,
    /// The machine has halted.
    Halt(Halt),
}

/// Why a machine stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// Reached the accepting state.
    Accept,
    /// Reached the rejecting state, or had no transition in `Normal` mode.
    Reject,
    /// Had no transition in `Strict` mode.
    Err(TuringMachineError),
}

/// Fatal defects detected while compiling a dual-track machine.
///
/// Both variants indicate a bug in the construction itself rather than bad input; the
/// source machine is validated before compilation starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Two phases tried to define the same `(state, symbol)` entry.
    #[error("Duplicate transition for state {state} reading {symbol}")]
    DuplicateTransition { state: State, symbol: Symbol },
    /// A table that should be total over its domain had no entry for `key`.
    #[error("Missing {table} entry for {key}")]
    MissingLookup { table: &'static str, key: String },
}

/// Represents various errors that can occur while validating, compiling or running machines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Indicates an attempt to transition to an invalid or undefined state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// Indicates that there's no rule defined for a particular set of symbols.
    #[error("No rule defined for state {0} and symbols {1:?}")]
    UndefinedTransition(String, Vec<Symbol>),
    /// Indicates an error during the validation of a machine's structure.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates a compiled tape that does not hold a well-formed encoding.
    #[error("Tape error: {0}")]
    TapeError(String),
    /// Indicates a defect detected while compiling.
    #[error("Compilation error: {0}")]
    Compile(#[from] CompileError),
}
