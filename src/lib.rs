//! This crate compiles dual-track Turing Machines into equivalent single-track, single-head
//! machines. It includes modules for describing and validating machines, compiling them,
//! simulating both the source and the compiled machine, converting between their tapes, and
//! a collection of predefined programs.

pub mod alphabet;
pub mod analyzer;
pub mod compiler;
pub mod ident;
pub mod machine;
pub mod programs;
pub mod role;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the encoded alphabet types from the alphabet module.
pub use alphabet::{EncodedAlphabet, LetterEncoding, Marker, Sentinels, TrackPair};
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the compiler entry point and the tables it exposes.
pub use compiler::{
    compile, AliasTable, Compilation, SimulatedState, SimulatedStates, SimulatedTransition,
    StateEncoding,
};
/// Re-exports the identifier generator.
pub use ident::IdentGenerator;
/// Re-exports the `TuringMachine` struct and the `word` helper from the machine module.
pub use machine::{word, TuringMachine};
/// Re-exports `ProgramManager` and `PROGRAMS` from the programs module.
pub use programs::{ProgramManager, PROGRAMS};
/// Re-exports the tape codec.
pub use tape::{decode_tape, encode_word, TrackView};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    CompileError, Direction, Halt, Machine, Mode, State, Step, Symbol, Transition,
    TuringMachineError, DEFAULT_BLANK_SYMBOL, MAX_EXECUTION_STEPS,
};
