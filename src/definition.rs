//! Serde representations of the rules documents for each automaton kind.
//!
//! Documents are checked section by section before typed deserialization so that a
//! missing section or transition key is reported by name rather than as a generic
//! serde error.

use crate::types::{AutomatonError, AutomatonKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A value that documents may give either as a scalar or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Normalizes the value to a list; a scalar becomes a one-element list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// A DFA or NFA rules document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaDefinition {
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub transitions: Vec<FaTransition>,
    pub start_state: String,
    pub final_states: OneOrMany<String>,
}

/// A finite automaton transition. An empty `input` is an epsilon move (NFA only).
///
/// NFA documents may list several next states in one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaTransition {
    pub current_state: String,
    pub input: String,
    pub next_state: OneOrMany<String>,
}

/// A pushdown automaton rules document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdaDefinition {
    pub states: Vec<String>,
    pub input_alphabet: Vec<String>,
    pub stack_alphabet: Vec<String>,
    pub transitions: Vec<PdaTransition>,
    pub start_state: String,
    pub start_stack_symbol: String,
    pub final_states: OneOrMany<String>,
}

/// A pushdown automaton transition.
///
/// `push_symbols` replaces the popped `stack_top`; its first character becomes the new top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdaTransition {
    pub current_state: String,
    pub input: String,
    pub stack_top: String,
    pub next_state: String,
    pub push_symbols: String,
}

/// A Turing machine rules document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmDefinition {
    pub states: Vec<String>,
    pub input_alphabet: Vec<String>,
    pub tape_alphabet: Vec<String>,
    pub transitions: Vec<TmTransition>,
    pub start_state: String,
    pub accept_state: String,
    pub reject_state: String,
    pub blank_symbol: String,
}

/// A Turing machine transition. `move` is `L` or `R` in either case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmTransition {
    pub current_state: String,
    pub read: String,
    pub next_state: String,
    pub write: String,
    #[serde(rename = "move")]
    pub direction: String,
}

const FA_SECTIONS: &[&str] = &[
    "states",
    "alphabet",
    "transitions",
    "start_state",
    "final_states",
];
const FA_TRANSITION_KEYS: &[&str] = &["current_state", "input", "next_state"];

const PDA_SECTIONS: &[&str] = &[
    "states",
    "input_alphabet",
    "stack_alphabet",
    "transitions",
    "start_state",
    "start_stack_symbol",
    "final_states",
];
const PDA_TRANSITION_KEYS: &[&str] = &[
    "current_state",
    "input",
    "stack_top",
    "next_state",
    "push_symbols",
];

const TM_SECTIONS: &[&str] = &[
    "states",
    "input_alphabet",
    "tape_alphabet",
    "transitions",
    "start_state",
    "accept_state",
    "reject_state",
    "blank_symbol",
];
const TM_TRANSITION_KEYS: &[&str] = &["current_state", "read", "next_state", "write", "move"];

/// Returns the required top-level sections and transition keys of a document kind.
pub fn required_keys(kind: AutomatonKind) -> (&'static [&'static str], &'static [&'static str]) {
    match kind {
        AutomatonKind::Dfa | AutomatonKind::Nfa => (FA_SECTIONS, FA_TRANSITION_KEYS),
        AutomatonKind::Pda => (PDA_SECTIONS, PDA_TRANSITION_KEYS),
        AutomatonKind::Tm => (TM_SECTIONS, TM_TRANSITION_KEYS),
    }
}

impl FaDefinition {
    /// Reads a DFA or NFA definition from a parsed document.
    pub fn from_value(kind: AutomatonKind, value: Value) -> Result<Self, AutomatonError> {
        from_checked_value(kind, value)
    }
}

impl PdaDefinition {
    /// Reads a PDA definition from a parsed document.
    pub fn from_value(value: Value) -> Result<Self, AutomatonError> {
        from_checked_value(AutomatonKind::Pda, value)
    }
}

impl TmDefinition {
    /// Reads a Turing machine definition from a parsed document.
    pub fn from_value(value: Value) -> Result<Self, AutomatonError> {
        from_checked_value(AutomatonKind::Tm, value)
    }
}

fn from_checked_value<T: DeserializeOwned>(
    kind: AutomatonKind,
    value: Value,
) -> Result<T, AutomatonError> {
    let (sections, transition_keys) = required_keys(kind);

    let document = value.as_object().ok_or_else(|| {
        AutomatonError::InvalidDocument("Rules document must be a JSON object".to_string())
    })?;

    check_sections(document, sections)?;
    check_transition_keys(document, transition_keys)?;

    serde_json::from_value(value).map_err(|e| AutomatonError::InvalidDocument(e.to_string()))
}

/// Checks that every required section is present, reporting all missing ones at once.
fn check_sections(document: &Map<String, Value>, sections: &[&str]) -> Result<(), AutomatonError> {
    let missing: Vec<String> = sections
        .iter()
        .filter(|section| !document.contains_key(**section))
        .map(|section| section.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(AutomatonError::MissingSections(missing));
    }

    Ok(())
}

/// Checks that `transitions` is a list of records carrying every required key.
fn check_transition_keys(
    document: &Map<String, Value>,
    keys: &[&str],
) -> Result<(), AutomatonError> {
    let transitions = document
        .get("transitions")
        .and_then(Value::as_array)
        .ok_or_else(|| AutomatonError::InvalidDocument("transitions must be a list".to_string()))?;

    for (index, transition) in transitions.iter().enumerate() {
        let record = transition.as_object().ok_or_else(|| {
            AutomatonError::InvalidDocument(format!("Transition {index} must be an object"))
        })?;

        let missing: Vec<String> = keys
            .iter()
            .filter(|key| !record.contains_key(**key))
            .map(|key| key.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AutomatonError::MissingTransitionKeys { index, missing });
        }
    }

    Ok(())
}
