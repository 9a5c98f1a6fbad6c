//! This crate provides simulators for four classic automata: deterministic finite
//! automata, nondeterministic finite automata with epsilon moves, pushdown automata
//! and single-tape Turing machines.
//! Each machine is built from a commented JSON rules document, validated once, and
//! can then decide any number of input strings.

pub mod analyzer;
pub mod automaton;
pub mod definition;
pub mod dfa;
pub mod loader;
pub mod nfa;
pub mod parser;
pub mod pda;
pub mod samples;
pub mod table;
pub mod tm;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `Automaton` enum over all four machines.
pub use automaton::Automaton;
/// Re-exports the rules document schema.
pub use definition::{FaDefinition, PdaDefinition, TmDefinition};
pub use dfa::Dfa;
pub use loader::RuleLoader;
pub use nfa::Nfa;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
pub use pda::Pda;
/// Re-exports `Sample`, `SampleManager`, and `SAMPLES` from the samples module.
pub use samples::{Sample, SampleManager, SAMPLES};
pub use table::TransitionTable;
pub use tm::{Configuration, Step, Tape, TuringMachine};
/// Re-exports the shared vocabulary types and constants.
pub use types::{
    AutomatonError, AutomatonKind, Direction, Outcome, DEFAULT_STEP_LIMIT, MAX_RULES_SIZE,
};
