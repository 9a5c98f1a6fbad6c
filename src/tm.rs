//! This module defines the `TuringMachine` struct, which simulates a single-tape Turing
//! machine. The tape is unbounded in both directions and stored sparsely; every run builds
//! its own `Configuration`, so one machine can serve concurrent callers.

use crate::analyzer::{
    check_state, check_symbol, parse_alphabet, parse_symbol, unreachable_states,
    warn_unreachable,
};
use crate::definition::{TmDefinition, TmTransition};
use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::{AutomatonError, Direction, Outcome, Symbol};
use std::collections::{HashMap, HashSet};

/// What a transition does: the symbol written under the head, where the head moves,
/// and the state entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub next_state: String,
    pub write: Symbol,
    pub direction: Direction,
}

/// Represents the outcome of a single step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a transition and continues execution.
    Continue,
    /// The machine has halted with the given outcome.
    Halt(Outcome),
}

/// A sparse bi-infinite tape. Cells never written read as the blank symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Tape {
    cells: HashMap<i64, Symbol>,
    blank: Symbol,
}

impl Tape {
    /// Writes `input` to cells `0..len`; every other cell is blank.
    pub fn new(input: &str, blank: Symbol) -> Self {
        let mut tape = Self {
            cells: HashMap::new(),
            blank,
        };

        for (position, symbol) in (0..).zip(input.chars()) {
            tape.write(position, symbol);
        }

        tape
    }

    pub fn read(&self, position: i64) -> Symbol {
        self.cells.get(&position).copied().unwrap_or(self.blank)
    }

    /// Writing the blank symbol frees the cell.
    pub fn write(&mut self, position: i64, symbol: Symbol) {
        if symbol == self.blank {
            self.cells.remove(&position);
        } else {
            self.cells.insert(position, symbol);
        }
    }

    /// Returns the non-blank span of the tape, or an empty string if the tape is blank.
    pub fn contents(&self) -> String {
        let (Some(&first), Some(&last)) = (self.cells.keys().min(), self.cells.keys().max())
        else {
            return String::new();
        };

        (first..=last).map(|position| self.read(position)).collect()
    }
}

/// The complete state of one run: current state, head position and tape.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration<'a> {
    state: &'a str,
    head: i64,
    tape: Tape,
    step_count: usize,
}

impl Configuration<'_> {
    /// Returns the current state.
    pub fn state(&self) -> &str {
        self.state
    }

    /// Returns the head position. Cells left of the input have negative positions.
    pub fn head(&self) -> i64 {
        self.head
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the number of transitions taken so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

/// Represents a deterministic single-tape Turing machine.
///
/// The machine holds only its definition. Tape, head and state live in a
/// [`Configuration`] created by [`TuringMachine::start`] for each run.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    states: HashSet<String>,
    input_alphabet: HashSet<Symbol>,
    tape_alphabet: HashSet<Symbol>,
    transitions: TransitionTable<Symbol, Action>,
    start_state: String,
    accept_state: String,
    reject_state: String,
    blank: Symbol,
}

impl TuringMachine {
    /// Validates a definition and builds the machine from it.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the definition is consistent.
    /// * `Err(AutomatonError::NonDeterministic)` if a `(state, read)` pair appears twice.
    /// * `Err(AutomatonError::InvalidDirection)` if a move is neither `L` nor `R`.
    /// * `Err(AutomatonError::ValidationError)` if the blank symbol is not on the tape
    ///   alphabet or the input alphabet is not contained in it.
    pub fn new(definition: TmDefinition) -> Result<Self, AutomatonError> {
        let states: HashSet<String> = definition.states.into_iter().collect();
        let input_alphabet = parse_alphabet(&definition.input_alphabet)?;
        let tape_alphabet = parse_alphabet(&definition.tape_alphabet)?;
        let blank = parse_symbol(&definition.blank_symbol)?;

        if !tape_alphabet.contains(&blank) {
            return Err(AutomatonError::ValidationError(format!(
                "Blank symbol '{blank}' must be in the tape alphabet"
            )));
        }

        let mut outside: Vec<Symbol> = input_alphabet
            .difference(&tape_alphabet)
            .copied()
            .collect();
        if !outside.is_empty() {
            outside.sort();
            return Err(AutomatonError::ValidationError(format!(
                "Input alphabet must be a subset of the tape alphabet, {outside:?} are not"
            )));
        }

        check_state(&states, &definition.start_state, "Start state")?;
        check_state(&states, &definition.accept_state, "Accept state")?;
        check_state(&states, &definition.reject_state, "Reject state")?;

        let mut transitions = TransitionTable::new();
        for transition in definition.transitions {
            let (state, read, action) = check_transition(&states, &tape_alphabet, transition)?;

            if !transitions.insert_unique(state.clone(), read, action) {
                return Err(AutomatonError::NonDeterministic {
                    state,
                    symbol: read,
                });
            }
        }

        let machine = Self {
            states,
            input_alphabet,
            tape_alphabet,
            transitions,
            start_state: definition.start_state,
            accept_state: definition.accept_state,
            reject_state: definition.reject_state,
            blank,
        };

        warn_unreachable(
            "Turing machine",
            &unreachable_states(&machine.states, &machine.start_state, |state| {
                machine
                    .transitions
                    .outgoing(state)
                    .map(|action| action.next_state.as_str())
            }),
        );
        tracing::debug!(
            states = machine.states.len(),
            tape_symbols = machine.tape_alphabet.len(),
            transitions = machine.transitions.len(),
            "built Turing machine"
        );

        Ok(machine)
    }

    /// Parses a commented JSON rules document and builds the machine from it.
    pub fn from_json(input: &str) -> Result<Self, AutomatonError> {
        Self::new(TmDefinition::from_value(parse(input)?)?)
    }

    /// Runs the machine on `input` for at most `step_limit` iterations.
    ///
    /// # Returns
    ///
    /// * `Outcome::Accepted` once the accept state is reached within the budget.
    /// * `Outcome::Rejected` once the reject state is reached, when no transition exists
    ///   for the current state and symbol, or when `input` has a symbol outside the input
    ///   alphabet.
    /// * `Outcome::Undecided` if all `step_limit` iterations pass without halting. An
    ///   iteration either halts or takes one transition, so a halting state entered on
    ///   the last iteration is never observed.
    pub fn simulate(&self, input: &str, step_limit: usize) -> Outcome {
        self.simulate_with(input, step_limit, |_| {})
    }

    /// Like [`TuringMachine::simulate`], calling `observe` with the initial configuration
    /// and after every transition taken.
    ///
    /// Input with a symbol outside the input alphabet is rejected before `observe` is
    /// ever called.
    pub fn simulate_with<F>(&self, input: &str, step_limit: usize, mut observe: F) -> Outcome
    where
        F: FnMut(&Configuration<'_>),
    {
        if let Some(symbol) = input.chars().find(|c| !self.input_alphabet.contains(c)) {
            tracing::warn!(%symbol, "symbol not in input alphabet, rejecting");
            return Outcome::Rejected;
        }

        let mut config = self.start(input);
        observe(&config);

        for _ in 0..step_limit {
            match self.step(&mut config) {
                Step::Continue => observe(&config),
                Step::Halt(outcome) => return outcome,
            }
        }

        Outcome::Undecided
    }

    /// Creates the initial configuration for `input`: start state, head on cell 0.
    pub fn start(&self, input: &str) -> Configuration<'_> {
        Configuration {
            state: &self.start_state,
            head: 0,
            tape: Tape::new(input, self.blank),
            step_count: 0,
        }
    }

    /// Executes a single step of the computation on `config`.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was taken.
    /// * `Step::Halt(_)` if the machine is in its accept or reject state, or has no
    ///   transition for the symbol under the head. `config` is left untouched.
    pub fn step<'a>(&'a self, config: &mut Configuration<'a>) -> Step {
        if let Some(outcome) = self.halted(config.state) {
            return Step::Halt(outcome);
        }

        let symbol = config.tape.read(config.head);
        let Some(action) = self.transitions.first(config.state, &symbol) else {
            tracing::debug!(state = config.state, %symbol, "no transition, rejecting");
            return Step::Halt(Outcome::Rejected);
        };

        config.tape.write(config.head, action.write);
        config.head += action.direction.offset();
        config.state = &action.next_state;
        config.step_count += 1;

        tracing::trace!(
            step = config.step_count,
            state = config.state,
            head = config.head,
            "Turing machine step"
        );

        Step::Continue
    }

    /// Returns the halting outcome of `state`, if it is the accept or reject state.
    fn halted(&self, state: &str) -> Option<Outcome> {
        if state == self.accept_state {
            Some(Outcome::Accepted)
        } else if state == self.reject_state {
            Some(Outcome::Rejected)
        } else {
            None
        }
    }
}

/// Validates one transition, returning its source state, read symbol and action.
fn check_transition(
    states: &HashSet<String>,
    tape_alphabet: &HashSet<Symbol>,
    transition: TmTransition,
) -> Result<(String, Symbol, Action), AutomatonError> {
    check_state(states, &transition.current_state, "Transition current_state")?;
    check_state(states, &transition.next_state, "Transition next_state")?;

    let read = parse_symbol(&transition.read)?;
    check_symbol(tape_alphabet, read, "Transition read", "tape alphabet")?;

    let write = parse_symbol(&transition.write)?;
    check_symbol(tape_alphabet, write, "Transition write", "tape alphabet")?;

    let direction = transition.direction.parse::<Direction>()?;

    Ok((
        transition.current_state,
        read,
        Action {
            next_state: transition.next_state,
            write,
            direction,
        },
    ))
}
