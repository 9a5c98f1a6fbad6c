//! This module defines the `Pda` struct, a nondeterministic pushdown automaton that
//! accepts by final state. A run tracks a set of `(state, stack)` configurations.

use crate::analyzer::{
    check_state, check_states, check_symbol, parse_alphabet, parse_input, parse_symbol,
    unreachable_states, warn_unreachable,
};
use crate::definition::{PdaDefinition, PdaTransition};
use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::{AutomatonError, Symbol};
use std::collections::{HashSet, VecDeque};

/// The effect of a PDA transition: the state to enter and the symbols that replace
/// the popped stack top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackMove {
    pub next_state: String,
    /// Written left to right: the first symbol ends up on top of the stack.
    pub push: Vec<Symbol>,
}

/// One point of a nondeterministic run. The top of the stack is the last element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Configuration<'a> {
    state: &'a str,
    stack: Vec<Symbol>,
}

impl<'a> Configuration<'a> {
    fn top(&self) -> Option<Symbol> {
        self.stack.last().copied()
    }

    /// Pops the top symbol and pushes `push` in reverse, so its first symbol is the new top.
    fn apply(&self, step: &'a StackMove) -> Configuration<'a> {
        let mut stack = self.stack.clone();
        stack.pop();
        stack.extend(step.push.iter().rev());

        Configuration {
            state: &step.next_state,
            stack,
        }
    }
}

/// A pushdown automaton with epsilon moves.
///
/// Transitions are keyed by `(state, input, stack top)`, with `None` as the epsilon input.
/// Every transition requires a concrete stack top, so a configuration whose stack is empty
/// can no longer move.
#[derive(Debug, Clone)]
pub struct Pda {
    states: HashSet<String>,
    input_alphabet: HashSet<Symbol>,
    stack_alphabet: HashSet<Symbol>,
    transitions: TransitionTable<(Option<Symbol>, Symbol), StackMove>,
    start_state: String,
    start_stack_symbol: Symbol,
    final_states: HashSet<String>,
}

impl Pda {
    /// Validates a definition and builds the automaton from it.
    ///
    /// # Returns
    ///
    /// * `Ok(Pda)` if the start state, start stack symbol, final states and every
    ///   transition reference only declared states and symbols.
    /// * `Err(AutomatonError)` describing the first violated invariant.
    pub fn new(definition: PdaDefinition) -> Result<Self, AutomatonError> {
        let states: HashSet<String> = definition.states.into_iter().collect();
        let input_alphabet = parse_alphabet(&definition.input_alphabet)?;
        let stack_alphabet = parse_alphabet(&definition.stack_alphabet)?;
        let final_states: HashSet<String> =
            definition.final_states.into_vec().into_iter().collect();

        check_state(&states, &definition.start_state, "Start state")?;
        let start_stack_symbol = parse_symbol(&definition.start_stack_symbol)?;
        check_symbol(
            &stack_alphabet,
            start_stack_symbol,
            "Start stack symbol",
            "stack alphabet",
        )?;
        check_states(&states, &final_states, "Final state")?;

        let mut transitions = TransitionTable::new();
        for transition in definition.transitions {
            let (state, key, step) =
                check_transition(&states, &input_alphabet, &stack_alphabet, transition)?;
            transitions.insert(state, key, step);
        }

        let pda = Self {
            states,
            input_alphabet,
            stack_alphabet,
            transitions,
            start_state: definition.start_state,
            start_stack_symbol,
            final_states,
        };

        warn_unreachable(
            "PDA",
            &unreachable_states(&pda.states, &pda.start_state, |state| {
                pda.transitions
                    .outgoing(state)
                    .map(|step| step.next_state.as_str())
            }),
        );
        tracing::debug!(
            states = pda.states.len(),
            stack_symbols = pda.stack_alphabet.len(),
            transitions = pda.transitions.len(),
            "built PDA"
        );

        Ok(pda)
    }

    /// Parses a commented JSON rules document and builds the automaton from it.
    pub fn from_json(input: &str) -> Result<Self, AutomatonError> {
        Self::new(PdaDefinition::from_value(parse(input)?)?)
    }

    /// Runs the automaton over `input`, one symbol per character.
    ///
    /// Returns `true` iff some configuration reachable after consuming the whole input is
    /// in a final state; the stack contents play no part in acceptance. A symbol outside
    /// the input alphabet rejects the whole run at once.
    ///
    /// Epsilon moves are explored until no new configuration appears (see
    /// [`Pda::epsilon_closure`]). If epsilon moves can grow the stack forever, the set of
    /// configurations is infinite and this call does not return.
    pub fn simulate(&self, input: &str) -> bool {
        let initial = Configuration {
            state: &self.start_state,
            stack: vec![self.start_stack_symbol],
        };
        let mut current = self.epsilon_closure(HashSet::from([initial]));

        for symbol in input.chars() {
            if !self.input_alphabet.contains(&symbol) {
                tracing::warn!(%symbol, "symbol not in input alphabet, rejecting");
                return false;
            }

            let next: HashSet<Configuration> = current
                .iter()
                .flat_map(|config| {
                    self.moves(config, Some(symbol))
                        .iter()
                        .map(move |step| config.apply(step))
                })
                .collect();

            if next.is_empty() {
                return false;
            }

            current = self.epsilon_closure(next);
            tracing::trace!(%symbol, configurations = current.len(), "PDA step");
        }

        current
            .iter()
            .any(|config| self.final_states.contains(config.state))
    }

    /// Returns the moves available from `config` on `input` (`None` for epsilon).
    fn moves(&self, config: &Configuration, input: Option<Symbol>) -> &[StackMove] {
        match config.top() {
            Some(top) => self.transitions.get(config.state, &(input, top)),
            None => &[],
        }
    }

    /// Returns every configuration reachable from `configs` through epsilon moves alone,
    /// including `configs` themselves.
    ///
    /// Termination relies only on skipping configurations already seen. The search is
    /// exact whenever finitely many configurations are epsilon-reachable; when epsilon
    /// moves keep pushing, every configuration is new and the search never finishes.
    /// No bound is placed on stack depth.
    fn epsilon_closure<'a>(
        &'a self,
        configs: HashSet<Configuration<'a>>,
    ) -> HashSet<Configuration<'a>> {
        let mut queue: VecDeque<Configuration<'a>> = configs.iter().cloned().collect();
        let mut closure = configs;

        while let Some(config) = queue.pop_front() {
            for step in self.moves(&config, None) {
                let next = config.apply(step);
                if !closure.contains(&next) {
                    closure.insert(next.clone());
                    queue.push_back(next);
                }
            }
        }

        closure
    }
}

/// Validates one transition, returning its source state, key and move.
fn check_transition(
    states: &HashSet<String>,
    input_alphabet: &HashSet<Symbol>,
    stack_alphabet: &HashSet<Symbol>,
    transition: PdaTransition,
) -> Result<(String, (Option<Symbol>, Symbol), StackMove), AutomatonError> {
    check_state(states, &transition.current_state, "Transition current_state")?;
    check_state(states, &transition.next_state, "Transition next_state")?;

    let input = parse_input(&transition.input)?;
    if let Some(symbol) = input {
        check_symbol(input_alphabet, symbol, "Transition input", "input alphabet")?;
    }

    let top = parse_symbol(&transition.stack_top)?;
    check_symbol(stack_alphabet, top, "Transition stack_top", "stack alphabet")?;

    let push: Vec<Symbol> = transition.push_symbols.chars().collect();
    for &symbol in &push {
        check_symbol(
            stack_alphabet,
            symbol,
            "Transition push_symbols",
            "stack alphabet",
        )?;
    }

    Ok((
        transition.current_state,
        (input, top),
        StackMove {
            next_state: transition.next_state,
            push,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// `0ⁿ1ⁿ` for n ≥ 0, accepted by final state.
    fn zeros_then_ones() -> Pda {
        Pda::from_json(
            r#"{
                "states": ["q0", "q1", "q2", "q3"],
                "input_alphabet": ["0", "1"],
                "stack_alphabet": ["Z", "A"],
                "transitions": [
                    {"current_state": "q0", "input": "0", "stack_top": "Z", "next_state": "q1", "push_symbols": "AZ"},
                    {"current_state": "q1", "input": "0", "stack_top": "A", "next_state": "q1", "push_symbols": "AA"},
                    {"current_state": "q1", "input": "1", "stack_top": "A", "next_state": "q2", "push_symbols": ""},
                    {"current_state": "q2", "input": "1", "stack_top": "A", "next_state": "q2", "push_symbols": ""},
                    {"current_state": "q2", "input": "", "stack_top": "Z", "next_state": "q3", "push_symbols": "Z"}
                ],
                "start_state": "q0",
                "start_stack_symbol": "Z",
                "final_states": ["q0", "q3"]
            }"#,
        )
        .unwrap()
    }

    /// Even-length palindromes over `{a, b}`, guessing the middle with an epsilon move.
    fn even_palindromes() -> Pda {
        Pda::from_json(
            r#"{
                "states": ["push", "pop", "done"],
                "input_alphabet": ["a", "b"],
                "stack_alphabet": ["Z", "a", "b"],
                "transitions": [
                    {"current_state": "push", "input": "a", "stack_top": "Z", "next_state": "push", "push_symbols": "aZ"},
                    {"current_state": "push", "input": "a", "stack_top": "a", "next_state": "push", "push_symbols": "aa"},
                    {"current_state": "push", "input": "a", "stack_top": "b", "next_state": "push", "push_symbols": "ab"},
                    {"current_state": "push", "input": "b", "stack_top": "Z", "next_state": "push", "push_symbols": "bZ"},
                    {"current_state": "push", "input": "b", "stack_top": "a", "next_state": "push", "push_symbols": "ba"},
                    {"current_state": "push", "input": "b", "stack_top": "b", "next_state": "push", "push_symbols": "bb"},
                    {"current_state": "push", "input": "", "stack_top": "Z", "next_state": "pop", "push_symbols": "Z"},
                    {"current_state": "push", "input": "", "stack_top": "a", "next_state": "pop", "push_symbols": "a"},
                    {"current_state": "push", "input": "", "stack_top": "b", "next_state": "pop", "push_symbols": "b"},
                    {"current_state": "pop", "input": "a", "stack_top": "a", "next_state": "pop", "push_symbols": ""},
                    {"current_state": "pop", "input": "b", "stack_top": "b", "next_state": "pop", "push_symbols": ""},
                    {"current_state": "pop", "input": "", "stack_top": "Z", "next_state": "done", "push_symbols": "Z"}
                ],
                "start_state": "push",
                "start_stack_symbol": "Z",
                "final_states": "done"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_zeros_then_ones() {
        let pda = zeros_then_ones();

        assert!(pda.simulate("0011"));
        assert!(pda.simulate("01"));
        assert!(pda.simulate("000111"));
        assert!(!pda.simulate("001"));
        assert!(!pda.simulate("10"));
        assert!(!pda.simulate("0101"));
    }

    #[test]
    fn test_empty_input_depends_on_start_closure() {
        // `q0` is final.
        assert!(zeros_then_ones().simulate(""));
        // `push` is not final, but `push -ε-> pop -ε-> done` is.
        assert!(even_palindromes().simulate(""));
    }

    #[test]
    fn test_even_palindromes() {
        let pda = even_palindromes();

        assert!(pda.simulate("abba"));
        assert!(pda.simulate("aa"));
        assert!(pda.simulate("baab"));
        assert!(!pda.simulate("aba"));
        assert!(!pda.simulate("ab"));
    }

    #[test]
    fn test_foreign_symbol_rejects() {
        assert!(!zeros_then_ones().simulate("0x1"));
    }

    #[test]
    fn test_first_push_symbol_becomes_top() {
        let step = StackMove {
            next_state: "q1".to_string(),
            push: vec!['A', 'B'],
        };
        let config = Configuration {
            state: "q0",
            stack: vec!['Z', 'X'],
        };

        let next = config.apply(&step);
        assert_eq!(next.state, "q1");
        assert_eq!(next.stack, vec!['Z', 'B', 'A']);
        assert_eq!(next.top(), Some('A'));

        // Replacing the top with nothing pops it, exposing `B`.
        let pop = StackMove {
            next_state: "q1".to_string(),
            push: Vec::new(),
        };
        assert_eq!(next.apply(&pop).top(), Some('B'));
    }

    #[test]
    fn test_empty_stack_matches_nothing() {
        let pda = Pda::from_json(
            r#"{
                "states": ["q0", "q1"],
                "input_alphabet": ["a"],
                "stack_alphabet": ["Z"],
                "transitions": [
                    {"current_state": "q0", "input": "a", "stack_top": "Z", "next_state": "q0", "push_symbols": ""},
                    {"current_state": "q0", "input": "a", "stack_top": "Z", "next_state": "q1", "push_symbols": "Z"}
                ],
                "start_state": "q0",
                "start_stack_symbol": "Z",
                "final_states": ["q0"]
            }"#,
        )
        .unwrap();

        // After the first `a` one branch has an empty stack and the other sits in `q1`.
        assert!(pda.simulate("a"));
        assert!(!pda.simulate("aa"));
    }

    #[test]
    fn test_epsilon_cycle_without_growth_terminates() {
        let pda = Pda::from_json(
            r#"{
                "states": ["p", "q"],
                "input_alphabet": ["a"],
                "stack_alphabet": ["Z"],
                "transitions": [
                    {"current_state": "p", "input": "", "stack_top": "Z", "next_state": "q", "push_symbols": "Z"},
                    {"current_state": "q", "input": "", "stack_top": "Z", "next_state": "p", "push_symbols": "Z"}
                ],
                "start_state": "p",
                "start_stack_symbol": "Z",
                "final_states": ["q"]
            }"#,
        )
        .unwrap();

        assert!(pda.simulate(""));
        assert!(!pda.simulate("a"));
    }

    #[test]
    fn test_invalid_transitions() {
        let template = |stack_top: &str, push: &str| {
            format!(
                r#"{{
                    "states": ["q0"],
                    "input_alphabet": ["a"],
                    "stack_alphabet": ["Z"],
                    "transitions": [
                        {{"current_state": "q0", "input": "a", "stack_top": "{stack_top}", "next_state": "q0", "push_symbols": "{push}"}}
                    ],
                    "start_state": "q0",
                    "start_stack_symbol": "Z",
                    "final_states": ["q0"]
                }}"#
            )
        };

        assert!(Pda::from_json(&template("Z", "ZZ")).is_ok());
        assert_eq!(
            Pda::from_json(&template("", "Z")).unwrap_err(),
            AutomatonError::InvalidSymbol(String::new())
        );
        assert!(matches!(
            Pda::from_json(&template("Y", "Z")),
            Err(AutomatonError::UndeclaredSymbol { symbol: 'Y', .. })
        ));
        assert!(matches!(
            Pda::from_json(&template("Z", "ZQ")),
            Err(AutomatonError::UndeclaredSymbol { symbol: 'Q', .. })
        ));
    }

    #[test]
    fn test_start_stack_symbol_must_be_declared() {
        let result = Pda::from_json(
            r#"{
                "states": ["q0"],
                "input_alphabet": ["a"],
                "stack_alphabet": ["Z"],
                "transitions": [],
                "start_state": "q0",
                "start_stack_symbol": "X",
                "final_states": ["q0"]
            }"#,
        );

        assert_eq!(
            result.unwrap_err().to_string(),
            "Start stack symbol 'X' is not in the stack alphabet"
        );
    }

    proptest! {
        #[test]
        fn epsilon_closure_is_idempotent(input in "[ab]{0,6}") {
            let pda = even_palindromes();
            let mut stack = vec!['Z'];
            stack.extend(input.chars());

            let seed = HashSet::from([Configuration { state: "push", stack }]);
            let closed = pda.epsilon_closure(seed);
            let reclosed = pda.epsilon_closure(closed.clone());

            prop_assert_eq!(closed, reclosed);
        }

        #[test]
        fn outcome_matches_counts(zeros in 0usize..6, ones in 0usize..6) {
            let input = format!("{}{}", "0".repeat(zeros), "1".repeat(ones));
            prop_assert_eq!(zeros_then_ones().simulate(&input), zeros == ones);
        }
    }
}
