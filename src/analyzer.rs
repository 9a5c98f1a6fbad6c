//! This module provides the construction-time checks shared by all simulators: symbol
//! spelling, membership of states and symbols in their declared sets, and a reachability
//! lint that reports states no run can ever enter.

use crate::types::{AutomatonError, Symbol, EPSILON};
use std::collections::HashSet;

/// Parses a document symbol, which must be exactly one character.
pub fn parse_symbol(raw: &str) -> Result<Symbol, AutomatonError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(AutomatonError::InvalidSymbol(raw.to_string())),
    }
}

/// Parses a transition input that may be epsilon, spelled as the empty string.
pub fn parse_input(raw: &str) -> Result<Option<Symbol>, AutomatonError> {
    if raw == EPSILON {
        return Ok(None);
    }

    parse_symbol(raw).map(Some)
}

/// Parses a declared alphabet into a set of symbols.
pub fn parse_alphabet(raw: &[String]) -> Result<HashSet<Symbol>, AutomatonError> {
    raw.iter().map(|symbol| parse_symbol(symbol)).collect()
}

/// Checks that `state` belongs to the declared states.
///
/// `context` names the field being checked and appears in the error message.
pub fn check_state(
    states: &HashSet<String>,
    state: &str,
    context: &str,
) -> Result<(), AutomatonError> {
    if !states.contains(state) {
        return Err(AutomatonError::UndeclaredState {
            state: state.to_string(),
            context: context.to_string(),
        });
    }

    Ok(())
}

/// Checks that every state in `candidates` belongs to the declared states.
pub fn check_states<'a>(
    states: &HashSet<String>,
    candidates: impl IntoIterator<Item = &'a String>,
    context: &str,
) -> Result<(), AutomatonError> {
    candidates
        .into_iter()
        .try_for_each(|state| check_state(states, state, context))
}

/// Checks that `symbol` belongs to `alphabet`, which is named `alphabet_name` in errors.
pub fn check_symbol(
    alphabet: &HashSet<Symbol>,
    symbol: Symbol,
    context: &str,
    alphabet_name: &str,
) -> Result<(), AutomatonError> {
    if !alphabet.contains(&symbol) {
        return Err(AutomatonError::UndeclaredSymbol {
            symbol,
            context: context.to_string(),
            alphabet: alphabet_name.to_string(),
        });
    }

    Ok(())
}

/// Finds the declared states that cannot be reached from `start_state`.
///
/// `successors` lists every state one transition away, ignoring what the transition reads.
/// The result is sorted to keep diagnostics deterministic.
pub fn unreachable_states<'a, F, I>(
    states: &'a HashSet<String>,
    start_state: &'a str,
    successors: F,
) -> Vec<&'a str>
where
    F: Fn(&str) -> I,
    I: IntoIterator<Item = &'a str>,
{
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = vec![start_state];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for next in successors(state) {
            if !visited.contains(next) {
                queue.push(next);
            }
        }
    }

    let mut unreachable: Vec<&str> = states
        .iter()
        .map(String::as_str)
        .filter(|state| !visited.contains(state))
        .collect();

    unreachable.sort(); // Sort for deterministic output
    unreachable
}

/// Logs states that no run can enter. Unreachable states never fail construction.
pub fn warn_unreachable(kind: &str, unreachable: &[&str]) {
    if !unreachable.is_empty() {
        tracing::warn!(automaton = kind, states = ?unreachable, "unreachable states detected");
    }
}
