//! This module defines the core data structures and types shared by the four simulators,
//! including symbols and states, move directions, run outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// A single alphabet, stack or tape symbol.
pub type Symbol = char;
/// An opaque state identifier.
pub type State = String;

/// The document spelling of an epsilon (empty) input in NFA and PDA transitions.
pub const EPSILON: &str = "";
/// The maximum allowed size for a rules document in bytes.
pub const MAX_RULES_SIZE: usize = 65536; // 64KB
/// The number of steps a Turing machine may take when no limit is given.
pub const DEFAULT_STEP_LIMIT: usize = 1000;

/// The four automaton formalisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutomatonKind {
    /// Deterministic finite automaton.
    Dfa,
    /// Nondeterministic finite automaton with epsilon moves.
    Nfa,
    /// Pushdown automaton accepting by final state.
    Pda,
    /// Single-tape Turing machine.
    Tm,
}

impl AutomatonKind {
    /// Returns the short upper-case label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            AutomatonKind::Dfa => "DFA",
            AutomatonKind::Nfa => "NFA",
            AutomatonKind::Pda => "PDA",
            AutomatonKind::Tm => "Turing Machine",
        }
    }
}

impl fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AutomatonKind {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfa" => Ok(AutomatonKind::Dfa),
            "nfa" => Ok(AutomatonKind::Nfa),
            "pda" => Ok(AutomatonKind::Pda),
            "tm" => Ok(AutomatonKind::Tm),
            _ => Err(AutomatonError::ValidationError(format!(
                "Unknown automaton kind: {s}"
            ))),
        }
    }
}

/// Represents the possible directions a Turing machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Returns the signed head offset for this direction.
    pub fn offset(&self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

impl FromStr for Direction {
    type Err = AutomatonError;

    /// Parses `L` or `R`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            _ => Err(AutomatonError::InvalidDirection(s.to_string())),
        }
    }
}

/// The result of running an automaton on an input string.
///
/// Finite automata and pushdown automata only ever produce `Accepted` or `Rejected`.
/// `Undecided` is reserved for Turing machines that exhaust their step budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Accepted,
    Rejected,
    /// The step limit was reached before the machine halted.
    Undecided,
}

impl From<bool> for Outcome {
    fn from(accepted: bool) -> Self {
        if accepted {
            Outcome::Accepted
        } else {
            Outcome::Rejected
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => f.write_str("Accepted"),
            Outcome::Rejected => f.write_str("Rejected"),
            Outcome::Undecided => f.write_str("Undecided (Step limit reached)"),
        }
    }
}

/// Represents the errors that can occur while loading or building an automaton.
///
/// Rejections are not errors: a run that falls off the transition table or reads a
/// foreign symbol yields [`Outcome::Rejected`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// Indicates the comment-stripping pass failed, e.g. on an unterminated comment.
    #[error("Rules parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates the document is not well-formed JSON or a section has the wrong shape.
    #[error("Invalid rules document: {0}")]
    InvalidDocument(String),
    /// Lists every required section absent from the document.
    #[error("Missing required sections: {0:?}")]
    MissingSections(Vec<String>),
    /// Indicates a transition record lacks required keys.
    #[error("Transition {index} missing required keys: {missing:?}")]
    MissingTransitionKeys { index: usize, missing: Vec<String> },
    /// Indicates a reference to a state that is not declared in `states`.
    #[error("{context} '{state}' is not a declared state")]
    UndeclaredState { state: String, context: String },
    /// Indicates a reference to a symbol that is not declared in the relevant alphabet.
    #[error("{context} '{symbol}' is not in the {alphabet}")]
    UndeclaredSymbol {
        symbol: Symbol,
        context: String,
        alphabet: String,
    },
    /// Indicates a symbol spelled with zero or several characters.
    #[error("Invalid symbol {0:?}: symbols must be exactly one character")]
    InvalidSymbol(String),
    /// Indicates two transitions share a key in a deterministic table.
    #[error("Non-deterministic transition: {state}, {symbol}")]
    NonDeterministic { state: String, symbol: Symbol },
    /// Indicates a Turing machine move other than `L` or `R`.
    #[error("Invalid move direction: {0}")]
    InvalidDirection(String),
    /// Indicates any other violated structural invariant.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error reading a rules file.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing_ignores_case() {
        assert_eq!("R".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("r".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("l".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(
            "S".parse::<Direction>().unwrap_err(),
            AutomatonError::InvalidDirection("S".to_string())
        );
    }

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let right: Direction = serde_json::from_str("\"Right\"").unwrap();
        assert_eq!(right, Direction::Right);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Accepted.to_string(), "Accepted");
        assert_eq!(Outcome::Rejected.to_string(), "Rejected");
        assert_eq!(
            Outcome::Undecided.to_string(),
            "Undecided (Step limit reached)"
        );
        assert_eq!(Outcome::from(true), Outcome::Accepted);
        assert_eq!(Outcome::from(false), Outcome::Rejected);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("PDA".parse::<AutomatonKind>().unwrap(), AutomatonKind::Pda);
        assert_eq!("tm".parse::<AutomatonKind>().unwrap(), AutomatonKind::Tm);
        assert!("lba".parse::<AutomatonKind>().is_err());
    }

    #[test]
    fn test_error_display() {
        let error = AutomatonError::NonDeterministic {
            state: "q0".to_string(),
            symbol: '1',
        };
        assert_eq!(error.to_string(), "Non-deterministic transition: q0, 1");

        let error = AutomatonError::UndeclaredState {
            state: "q9".to_string(),
            context: "Start state".to_string(),
        };
        assert_eq!(error.to_string(), "Start state 'q9' is not a declared state");
    }
}
