//! This module defines the `Dfa` struct, a partial deterministic finite automaton.
//! Missing transitions and foreign symbols reject the input rather than raising errors.

use crate::analyzer::{
    check_state, check_states, check_symbol, parse_alphabet, parse_symbol, unreachable_states,
    warn_unreachable,
};
use crate::definition::{FaDefinition, FaTransition};
use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::{AutomatonError, AutomatonKind, Symbol};
use std::collections::HashSet;

/// A deterministic finite automaton.
///
/// The model is immutable once built; every call to [`Dfa::simulate`] starts afresh.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: HashSet<String>,
    alphabet: HashSet<Symbol>,
    transitions: TransitionTable<Symbol, String>,
    start_state: String,
    final_states: HashSet<String>,
}

impl Dfa {
    /// Validates a definition and builds the automaton from it.
    ///
    /// # Returns
    ///
    /// * `Ok(Dfa)` if every state and symbol is declared and the table is a function.
    /// * `Err(AutomatonError::NonDeterministic)` if a `(state, input)` pair appears twice.
    /// * `Err(AutomatonError)` describing the first other violated invariant.
    pub fn new(definition: FaDefinition) -> Result<Self, AutomatonError> {
        let states: HashSet<String> = definition.states.into_iter().collect();
        let alphabet = parse_alphabet(&definition.alphabet)?;
        let final_states: HashSet<String> =
            definition.final_states.into_vec().into_iter().collect();

        check_state(&states, &definition.start_state, "Start state")?;
        check_states(&states, &final_states, "Final state")?;

        let mut transitions = TransitionTable::new();
        for transition in definition.transitions {
            let (state, symbol, next_state) = check_transition(&states, &alphabet, transition)?;

            if !transitions.insert_unique(state.clone(), symbol, next_state) {
                return Err(AutomatonError::NonDeterministic { state, symbol });
            }
        }

        let dfa = Self {
            states,
            alphabet,
            transitions,
            start_state: definition.start_state,
            final_states,
        };

        warn_unreachable(
            "DFA",
            &unreachable_states(&dfa.states, &dfa.start_state, |state| {
                dfa.transitions.outgoing(state).map(String::as_str)
            }),
        );
        tracing::debug!(
            states = dfa.states.len(),
            transitions = dfa.transitions.len(),
            "built DFA"
        );

        Ok(dfa)
    }

    /// Parses a commented JSON rules document and builds the automaton from it.
    pub fn from_json(input: &str) -> Result<Self, AutomatonError> {
        Self::new(FaDefinition::from_value(AutomatonKind::Dfa, parse(input)?)?)
    }

    /// Runs the automaton over `input`, one symbol per character.
    ///
    /// Returns `true` iff every symbol has a transition and the run ends in a final state.
    pub fn simulate(&self, input: &str) -> bool {
        let mut state = self.start_state.as_str();

        for symbol in input.chars() {
            if !self.alphabet.contains(&symbol) {
                tracing::debug!(%symbol, "symbol not in alphabet");
                return false;
            }

            match self.transitions.first(state, &symbol) {
                Some(next_state) => {
                    tracing::trace!(from = state, %symbol, to = %next_state, "DFA step");
                    state = next_state;
                }
                None => return false,
            }
        }

        self.final_states.contains(state)
    }
}

/// Validates one transition, returning its key and single next state.
fn check_transition(
    states: &HashSet<String>,
    alphabet: &HashSet<Symbol>,
    transition: FaTransition,
) -> Result<(String, Symbol, String), AutomatonError> {
    check_state(states, &transition.current_state, "Transition current_state")?;

    let symbol = parse_symbol(&transition.input)?;
    check_symbol(alphabet, symbol, "Transition input", "alphabet")?;

    let mut next_states = transition.next_state.into_vec();
    if next_states.len() != 1 {
        return Err(AutomatonError::ValidationError(format!(
            "DFA transition from '{}' on '{}' must name exactly one next state",
            transition.current_state, symbol
        )));
    }

    let next_state = next_states.remove(0);
    check_state(states, &next_state, "Transition next_state")?;

    Ok((transition.current_state, symbol, next_state))
}
