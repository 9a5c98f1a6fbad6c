//! This module defines the `Nfa` struct, a nondeterministic finite automaton with
//! epsilon moves. A run tracks the set of every state the automaton could be in.

use crate::analyzer::{
    check_state, check_states, check_symbol, parse_alphabet, parse_input, unreachable_states,
    warn_unreachable,
};
use crate::definition::FaDefinition;
use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::{AutomatonError, AutomatonKind, Symbol};
use std::collections::{HashSet, VecDeque};

/// A nondeterministic finite automaton. Epsilon moves are keyed by `None`.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: HashSet<String>,
    alphabet: HashSet<Symbol>,
    transitions: TransitionTable<Option<Symbol>, String>,
    start_state: String,
    final_states: HashSet<String>,
}

impl Nfa {
    /// Validates a definition and builds the automaton from it.
    ///
    /// Transitions sharing a `(state, input)` key accumulate into one result set.
    pub fn new(definition: FaDefinition) -> Result<Self, AutomatonError> {
        let states: HashSet<String> = definition.states.into_iter().collect();
        let alphabet = parse_alphabet(&definition.alphabet)?;
        let final_states: HashSet<String> =
            definition.final_states.into_vec().into_iter().collect();

        check_state(&states, &definition.start_state, "Start state")?;
        check_states(&states, &final_states, "Final state")?;

        let mut transitions = TransitionTable::new();
        for transition in definition.transitions {
            check_state(&states, &transition.current_state, "Transition current_state")?;

            let input = parse_input(&transition.input)?;
            if let Some(symbol) = input {
                check_symbol(&alphabet, symbol, "Transition input", "alphabet")?;
            }

            for next_state in transition.next_state.into_vec() {
                check_state(&states, &next_state, "Transition next_state")?;
                transitions.insert(transition.current_state.clone(), input, next_state);
            }
        }

        let nfa = Self {
            states,
            alphabet,
            transitions,
            start_state: definition.start_state,
            final_states,
        };

        warn_unreachable(
            "NFA",
            &unreachable_states(&nfa.states, &nfa.start_state, |state| {
                nfa.transitions.outgoing(state).map(String::as_str)
            }),
        );
        tracing::debug!(
            states = nfa.states.len(),
            transitions = nfa.transitions.len(),
            "built NFA"
        );

        Ok(nfa)
    }

    /// Parses a commented JSON rules document and builds the automaton from it.
    pub fn from_json(input: &str) -> Result<Self, AutomatonError> {
        Self::new(FaDefinition::from_value(AutomatonKind::Nfa, parse(input)?)?)
    }

    /// Runs the automaton over `input`, one symbol per character.
    ///
    /// Returns `true` iff some state reachable after consuming the whole input is final.
    /// A symbol that no current state can consume rejects immediately.
    pub fn simulate(&self, input: &str) -> bool {
        let mut current = self.epsilon_closure([self.start_state.as_str()]);

        for symbol in input.chars() {
            if !self.alphabet.contains(&symbol) {
                tracing::debug!(%symbol, "symbol not in alphabet");
                return false;
            }

            let next: HashSet<&str> = current
                .iter()
                .flat_map(|state| self.transitions.get(state, &Some(symbol)))
                .map(String::as_str)
                .collect();

            if next.is_empty() {
                return false;
            }

            current = self.epsilon_closure(next);
            tracing::trace!(%symbol, states = ?current, "NFA step");
        }

        current
            .iter()
            .any(|state| self.final_states.contains(*state))
    }

    /// Returns every state reachable from `states` through epsilon moves alone,
    /// including `states` themselves.
    ///
    /// Each state is enqueued at most once, so the search always terminates.
    fn epsilon_closure<'a>(
        &'a self,
        states: impl IntoIterator<Item = &'a str>,
    ) -> HashSet<&'a str> {
        let mut closure: HashSet<&str> = HashSet::new();
        let mut queue = VecDeque::new();

        for state in states {
            if closure.insert(state) {
                queue.push_back(state);
            }
        }

        while let Some(state) = queue.pop_front() {
            for next in self.transitions.get(state, &None) {
                if closure.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }

        closure
    }
}
