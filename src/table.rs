//! This module provides `TransitionTable`, the keyed multimap shared by every simulator.
//!
//! A table maps a source state and a trigger to the results of firing that trigger.
//! The trigger type carries the key's arity: a plain symbol for DFA and Turing machine
//! tables, an optional symbol (epsilon is `None`) for NFA tables, and an optional symbol
//! paired with the required stack top for PDA tables.

use std::collections::HashMap;
use std::hash::Hash;

/// A state-first transition table: `state -> trigger -> results`.
#[derive(Debug, Clone)]
pub struct TransitionTable<K, R> {
    rules: HashMap<String, HashMap<K, Vec<R>>>,
}

impl<K, R> Default for TransitionTable<K, R> {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }
}

impl<K, R> TransitionTable<K, R>
where
    K: Eq + Hash,
    R: PartialEq,
{
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `result` to the set stored under `(state, trigger)`.
    ///
    /// Equal results are stored once, so the results behave as a set.
    pub fn insert(&mut self, state: impl Into<String>, trigger: K, result: R) {
        let results = self
            .rules
            .entry(state.into())
            .or_default()
            .entry(trigger)
            .or_default();

        if !results.contains(&result) {
            results.push(result);
        }
    }

    /// Stores `result` under `(state, trigger)` only if the key is still free.
    ///
    /// Returns `false` without modifying the table when the key already has a result.
    pub fn insert_unique(&mut self, state: impl Into<String>, trigger: K, result: R) -> bool {
        let results = self
            .rules
            .entry(state.into())
            .or_default()
            .entry(trigger)
            .or_default();

        if !results.is_empty() {
            return false;
        }

        results.push(result);
        true
    }

    /// Returns every result stored under `(state, trigger)`, or an empty slice.
    pub fn get(&self, state: &str, trigger: &K) -> &[R] {
        self.rules
            .get(state)
            .and_then(|triggers| triggers.get(trigger))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the single result of a deterministic key.
    pub fn first(&self, state: &str, trigger: &K) -> Option<&R> {
        self.get(state, trigger).first()
    }

    /// Returns the number of distinct `(state, trigger)` keys.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every result leaving `state`, whatever its trigger.
    pub fn outgoing(&self, state: &str) -> impl Iterator<Item = &R> {
        self.rules
            .get(state)
            .into_iter()
            .flat_map(|triggers| triggers.values())
            .flatten()
    }
}
