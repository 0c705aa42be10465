//! Built-in dual-track machines, used for demonstrations and equivalence checks.

use crate::types::Direction::{Left, Right, Stay};
use crate::types::{Machine, TuringMachineError, DEFAULT_BLANK_SYMBOL};

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Machine> = vec![
        accept_zero(),
        copy_to_bottom(),
        palindrome(),
        runaway(),
        stuck(),
    ];
}

/// Accepts every word starting with `0`.
fn accept_zero() -> Machine {
    Machine::new("accept-zero", 2, DEFAULT_BLANK_SYMBOL)
        .with_input(&["0"])
        .with_states("I", "Accept", "Reject")
        .rule("I", &["0", "_"], &["0", "_"], &[Stay, Stay], "Accept")
}

/// Copies the word onto the bottom track behind a `#`, then walks the bottom head back home.
fn copy_to_bottom() -> Machine {
    let mut machine = Machine::new("copy-to-bottom", 2, DEFAULT_BLANK_SYMBOL)
        .with_input(&["0", "1"])
        .with_symbols(&["#"])
        .rule("start", &["_", "_"], &["_", "_"], &[Stay, Stay], "accept");

    for a in ["0", "1"] {
        machine = machine
            .rule("start", &[a, "_"], &[a, "#"], &[Stay, Right], "copy")
            .rule("copy", &[a, "_"], &[a, a], &[Right, Right], "copy")
            .rule("rewind", &["_", a], &["_", a], &[Stay, Left], "rewind");
    }

    machine
        .rule("copy", &["_", "_"], &["_", "_"], &[Stay, Left], "rewind")
        .rule("rewind", &["_", "#"], &["_", "#"], &[Stay, Stay], "accept")
}

/// Accepts palindromes over `{a, b}`.
///
/// The word is copied onto the bottom track with its first cell capitalised on the top track.
/// The top head then walks back to that cell and the word is compared against its copy read
/// backwards. The bottom head bumps into the left end while the top head finishes the word.
fn palindrome() -> Machine {
    let letters = [("a", "A"), ("b", "B")];
    let mut machine = Machine::new("palindrome", 2, DEFAULT_BLANK_SYMBOL)
        .with_input(&["a", "b"])
        .with_symbols(&["A", "B"])
        .rule("start", &["_", "_"], &["_", "_"], &[Stay, Stay], "accept")
        .rule("copy", &["_", "_"], &["_", "_"], &[Left, Left], "rewind");

    for (lower, upper) in letters {
        machine = machine
            .rule("start", &[lower, "_"], &[upper, lower], &[Right, Right], "copy")
            .rule("copy", &[lower, "_"], &[lower, lower], &[Right, Right], "copy")
            .rule("compare", &["_", lower], &["_", lower], &[Stay, Stay], "accept");

        for (other, _) in letters {
            machine = machine
                .rule("rewind", &[other, lower], &[other, lower], &[Left, Stay], "rewind")
                .rule("rewind", &[upper, other], &[upper, other], &[Stay, Stay], "compare");

            let next = if lower == other { "compare" } else { "reject" };
            machine = machine
                .rule("compare", &[lower, other], &[lower, other], &[Right, Left], next)
                .rule("compare", &[upper, other], &[upper, other], &[Right, Left], next);
        }
    }

    machine
}

/// Walks both heads right forever.
fn runaway() -> Machine {
    Machine::new("runaway", 2, DEFAULT_BLANK_SYMBOL)
        .with_input(&["0"])
        .rule("start", &["0", "_"], &["0", "_"], &[Right, Right], "start")
        .rule("start", &["_", "_"], &["_", "_"], &[Right, Right], "start")
}

/// Marks the bottom track under the first cell and skips the remaining zeros, then has no
/// transition left and halts without reaching a verdict state.
fn stuck() -> Machine {
    Machine::new("stuck", 2, DEFAULT_BLANK_SYMBOL)
        .with_input(&["0"])
        .with_symbols(&["1"])
        .rule("start", &["0", "_"], &["1", "1"], &[Right, Stay], "skip")
        .rule("skip", &["0", "1"], &["0", "1"], &[Right, Stay], "skip")
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Machine, TuringMachineError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            TuringMachineError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Machine, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS.iter().map(|program| program.name.clone()).collect()
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, program)| program.name.to_lowercase().contains(&query.to_lowercase()))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::machine::{word, TuringMachine};
    use crate::types::{Halt, Step};

    fn verdict(name: &str, input: &str) -> Step {
        let program = ProgramManager::get_program_by_name(name).unwrap();
        TuringMachine::new(program, &word(input))
            .with_max_steps(1000)
            .run()
    }

    #[test]
    fn test_all_programs_are_valid() {
        for i in 0..ProgramManager::get_program_count() {
            let program = ProgramManager::get_program_by_index(i).unwrap();
            assert!(
                analyze(&program).is_ok(),
                "Program '{}' is invalid",
                program.name
            );
            assert_eq!(program.tracks, 2);
            assert_eq!(program.blank, DEFAULT_BLANK_SYMBOL);
        }
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert_eq!(
            names,
            vec!["accept-zero", "copy-to-bottom", "palindrome", "runaway", "stuck"]
        );
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
    }

    #[test]
    fn test_program_manager_get_program_by_name() {
        let program = ProgramManager::get_program_by_name("accept-zero").unwrap();
        assert_eq!(program.initial_state, "I");

        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_program_manager_search_programs() {
        assert_eq!(ProgramManager::search_programs("PALIN"), vec![2]);
        assert!(ProgramManager::search_programs("nonexistent").is_empty());
    }

    #[test]
    fn test_accept_zero() {
        assert_eq!(verdict("accept-zero", "0"), Step::Halt(Halt::Accept));
        assert_eq!(verdict("accept-zero", "00"), Step::Halt(Halt::Accept));
        assert_eq!(verdict("accept-zero", ""), Step::Halt(Halt::Reject));
    }

    #[test]
    fn test_copy_to_bottom() {
        let program = ProgramManager::get_program_by_name("copy-to-bottom").unwrap();
        let mut machine = TuringMachine::new(program, &word("101"));

        assert_eq!(machine.run(), Step::Halt(Halt::Accept));
        assert_eq!(machine.tracks()[1][..4], word("#101")[..]);
        assert_eq!(machine.heads(), &[3, 0]);
        assert_eq!(verdict("copy-to-bottom", ""), Step::Halt(Halt::Accept));
    }

    #[test]
    fn test_palindrome() {
        for input in ["", "a", "aa", "aba", "abba", "babab"] {
            assert_eq!(verdict("palindrome", input), Step::Halt(Halt::Accept), "{input}");
        }
        for input in ["ab", "abb", "aab", "abab"] {
            assert_eq!(verdict("palindrome", input), Step::Halt(Halt::Reject), "{input}");
        }
    }

    #[test]
    fn test_runaway_exhausts_budget() {
        assert_eq!(verdict("runaway", "0"), Step::Continue);
    }

    #[test]
    fn test_stuck_halts_without_verdict() {
        let program = ProgramManager::get_program_by_name("stuck").unwrap();
        let mut machine = TuringMachine::new(program, &word("00"));

        assert_eq!(machine.run(), Step::Halt(Halt::Reject));
        assert_eq!(machine.state(), "skip");
    }
}
