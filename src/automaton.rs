//! A single type over the four simulators, for callers that pick the formalism at runtime.

use crate::definition::{FaDefinition, PdaDefinition, TmDefinition};
use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::parser::parse;
use crate::pda::Pda;
use crate::tm::TuringMachine;
use crate::types::{AutomatonError, AutomatonKind, Outcome};
use serde_json::Value;

/// Any of the four automata.
#[derive(Debug, Clone)]
pub enum Automaton {
    Dfa(Dfa),
    Nfa(Nfa),
    Pda(Pda),
    Tm(TuringMachine),
}

impl Automaton {
    /// Builds an automaton of the given kind from a parsed rules document.
    pub fn from_value(kind: AutomatonKind, value: Value) -> Result<Self, AutomatonError> {
        let automaton = match kind {
            AutomatonKind::Dfa => Automaton::Dfa(Dfa::new(FaDefinition::from_value(kind, value)?)?),
            AutomatonKind::Nfa => Automaton::Nfa(Nfa::new(FaDefinition::from_value(kind, value)?)?),
            AutomatonKind::Pda => Automaton::Pda(Pda::new(PdaDefinition::from_value(value)?)?),
            AutomatonKind::Tm => {
                Automaton::Tm(TuringMachine::new(TmDefinition::from_value(value)?)?)
            }
        };

        Ok(automaton)
    }

    /// Parses a commented JSON rules document and builds an automaton of the given kind.
    pub fn from_json(kind: AutomatonKind, input: &str) -> Result<Self, AutomatonError> {
        Self::from_value(kind, parse(input)?)
    }

    pub fn kind(&self) -> AutomatonKind {
        match self {
            Automaton::Dfa(_) => AutomatonKind::Dfa,
            Automaton::Nfa(_) => AutomatonKind::Nfa,
            Automaton::Pda(_) => AutomatonKind::Pda,
            Automaton::Tm(_) => AutomatonKind::Tm,
        }
    }

    /// Runs the automaton on `input`. `step_limit` only bounds Turing machines.
    pub fn run(&self, input: &str, step_limit: usize) -> Outcome {
        match self {
            Automaton::Dfa(dfa) => dfa.simulate(input).into(),
            Automaton::Nfa(nfa) => nfa.simulate(input).into(),
            Automaton::Pda(pda) => pda.simulate(input).into(),
            Automaton::Tm(machine) => machine.simulate(input, step_limit),
        }
    }
}
