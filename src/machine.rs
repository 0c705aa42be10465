//! This module defines the `TuringMachine` struct, which simulates a `Machine` over a tape split
//! into one or more tracks. It runs both the dual-track machines accepted by the compiler and
//! the single-track machines it produces.

use crate::types::{
    Direction, Halt, Machine, Mode, Step, Symbol, Transition, TuringMachineError,
    MAX_EXECUTION_STEPS,
};

/// Splits `text` into one symbol per character.
pub fn word(text: &str) -> Vec<Symbol> {
    text.chars().map(|c| c.to_string()).collect()
}

/// Represents a running Turing Machine.
///
/// Every track is one-way infinite to the right and grows lazily with blanks. The input word
/// is written on the first track; all heads start on cell 0.
pub struct TuringMachine {
    state: String,
    tracks: Vec<Vec<Symbol>>,
    heads: Vec<usize>,
    word: Vec<Symbol>,
    machine: Machine,
    step_count: usize,
    max_steps: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` running `machine` on `word`.
    ///
    /// # Arguments
    ///
    /// * `machine` - The `Machine` to simulate.
    /// * `word` - The input word, written on the first track.
    pub fn new(machine: Machine, word: &[Symbol]) -> Self {
        let mut simulator = Self {
            state: machine.initial_state.clone(),
            tracks: Vec::new(),
            heads: Vec::new(),
            word: word.to_vec(),
            machine,
            step_count: 0,
            max_steps: MAX_EXECUTION_STEPS,
        };
        simulator.reset();
        simulator
    }

    /// Sets the number of steps `run` executes before giving up.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Executes a single step of the machine's computation.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the machine performed a step.
    /// * `Step::Halt(Halt::Accept)` or `Step::Halt(Halt::Reject)` if the machine is in its
    ///   accepting or rejecting state.
    /// * `Step::Halt(Halt::Err(TuringMachineError::InvalidState))` if the machine is stuck in
    ///   a state it never declared, whatever its `Mode`.
    /// * `Step::Halt(_)` according to the machine's `Mode` if no transition applies.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = self.verdict() {
            return Step::Halt(halt);
        }

        let transition = match self.transition().cloned() {
            Some(t) => t,
            None if !self.machine.states.contains(&self.state) => {
                return Step::Halt(Halt::Err(TuringMachineError::InvalidState(
                    self.state.clone(),
                )));
            }
            None => {
                return match self.machine.mode {
                    Mode::Normal => Step::Halt(Halt::Reject),
                    Mode::Strict => Step::Halt(Halt::Err(TuringMachineError::UndefinedTransition(
                        self.state.clone(),
                        self.symbols(),
                    ))),
                };
            }
        };

        for (i, track) in self.tracks.iter_mut().enumerate() {
            let head = self.heads[i];
            if head >= track.len() {
                track.resize(head + 1, self.machine.blank.clone());
            }
            track[head] = transition.write[i].clone();

            match transition.directions[i] {
                // The tape has no cells left of 0; the head stays put.
                Direction::Left => self.heads[i] = head.saturating_sub(1),
                Direction::Right => self.heads[i] = head + 1,
                Direction::Stay => {}
            }
        }

        self.state = transition.next_state;
        self.step_count += 1;

        Step::Continue
    }

    /// Runs the machine until it halts or the step budget is spent.
    ///
    /// # Returns
    ///
    /// * `Step::Halt(_)` with the reason the machine stopped.
    /// * `Step::Continue` if the budget ran out first.
    pub fn run(&mut self) -> Step {
        while self.step_count < self.max_steps {
            if let Step::Halt(halt) = self.step() {
                return Step::Halt(halt);
            }
        }

        self.verdict().map_or(Step::Continue, Step::Halt)
    }

    fn verdict(&self) -> Option<Halt> {
        if self.state == self.machine.accept_state {
            Some(Halt::Accept)
        } else if self.state == self.machine.reject_state {
            Some(Halt::Reject)
        } else {
            None
        }
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the simulated machine.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Resets the machine to its initial configuration over the same input word.
    pub fn reset(&mut self) {
        self.state = self.machine.initial_state.clone();
        self.tracks = vec![Vec::new(); self.machine.tracks];
        if let Some(first) = self.tracks.first_mut() {
            first.clone_from(&self.word);
        }
        self.heads = vec![0; self.machine.tracks];
        self.step_count = 0;
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Checks if the machine is halted: it is in a verdict state or no transition applies.
    pub fn is_halted(&self) -> bool {
        self.verdict().is_some() || self.transition().is_none()
    }

    /// Returns the tracks written so far. Cells past the end of a track are blank.
    pub fn tracks(&self) -> &[Vec<Symbol>] {
        &self.tracks
    }

    /// Returns the head position on every track.
    pub fn heads(&self) -> &[usize] {
        &self.heads
    }

    /// Returns the symbols currently under each track's head.
    /// If a head is beyond its track's current length, the blank symbol is returned for that track.
    ///
    /// | a | b | c | track 1
    /// | d | e |   | track 2
    ///   0   1   2   index
    ///
    /// heads [0, 2] will return ["a", "_"]
    pub fn symbols(&self) -> Vec<Symbol> {
        self.heads
            .iter()
            .zip(&self.tracks)
            .map(|(&pos, track)| {
                track
                    .get(pos)
                    .cloned()
                    .unwrap_or_else(|| self.machine.blank.clone())
            })
            .collect()
    }

    /// Finds the `Transition` for the current state and the symbols under the heads.
    pub fn transition(&self) -> Option<&Transition> {
        self.machine.transition(&self.state, &self.symbols())
    }

    /// Returns the blank symbol used by this machine.
    pub fn blank(&self) -> &Symbol {
        &self.machine.blank
    }
}
