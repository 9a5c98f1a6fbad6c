//! This module provides the `RuleLoader` struct, responsible for loading rules documents
//! from files and strings and building automata from them.

use crate::automaton::Automaton;
use crate::parser::parse;
use crate::types::{AutomatonError, AutomatonKind};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// `RuleLoader` is a utility struct for loading rules documents.
pub struct RuleLoader;

impl RuleLoader {
    /// Reads and parses the rules document at `path`, without building an automaton.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` if the file is read and holds well-formed commented JSON.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * `Err(AutomatonError)` from [`parse`] otherwise.
    pub fn load_document(path: &Path) -> Result<Value, AutomatonError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads the rules file at `path` and builds an automaton of the given kind.
    pub fn load(kind: AutomatonKind, path: &Path) -> Result<Automaton, AutomatonError> {
        let document = Self::load_document(path)?;
        tracing::debug!(path = %path.display(), %kind, "loaded rules document");

        Automaton::from_value(kind, document)
    }

    /// Builds an automaton of the given kind from rules held in a string.
    ///
    /// This is useful for rules that are not stored in files, e.g., from user input.
    pub fn load_from_string(kind: AutomatonKind, content: &str) -> Result<Automaton, AutomatonError> {
        Automaton::from_json(kind, content)
    }
}
