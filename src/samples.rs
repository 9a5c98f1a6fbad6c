//! Embedded sample rule documents, one per formalism.

use crate::automaton::Automaton;
use crate::types::{AutomatonError, AutomatonKind};
use serde_json::Value;

// Default embedded samples
const SAMPLE_TEXTS: [(AutomatonKind, &str); 4] = [
    (AutomatonKind::Dfa, include_str!("../rules/dfa_rules.fa")),
    (AutomatonKind::Nfa, include_str!("../rules/nfa_rules.fa")),
    (AutomatonKind::Pda, include_str!("../rules/pda_rules.fa")),
    (AutomatonKind::Tm, include_str!("../rules/tm_rules.fa")),
];

lazy_static::lazy_static! {
    pub static ref SAMPLES: Vec<Sample> = SAMPLE_TEXTS
        .iter()
        .filter_map(|&(kind, text)| match Sample::from_text(kind, text) {
            Ok(sample) => Some(sample),
            Err(e) => {
                tracing::error!(%kind, error = %e, "failed to parse embedded sample");
                None
            }
        })
        .collect();
}

/// An embedded rules document together with the kind of automaton it describes.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub description: String,
    pub kind: AutomatonKind,
    pub text: &'static str,
    document: Value,
}

impl Sample {
    fn from_text(kind: AutomatonKind, text: &'static str) -> Result<Self, AutomatonError> {
        let document = crate::parser::parse(text)?;
        let field = |key: &str| {
            document
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    AutomatonError::InvalidDocument(format!("Sample is missing a '{}'", key))
                })
        };

        Ok(Self {
            name: field("name")?,
            description: field("description")?,
            kind,
            text,
            document,
        })
    }

    /// Builds the automaton this sample describes.
    pub fn build(&self) -> Result<Automaton, AutomatonError> {
        Automaton::from_value(self.kind, self.document.clone())
    }
}

pub struct SampleManager;

impl SampleManager {
    /// Get the number of available samples
    pub fn get_sample_count() -> usize {
        SAMPLES.len()
    }

    /// List all sample names
    pub fn list_sample_names() -> Vec<String> {
        SAMPLES.iter().map(|sample| sample.name.clone()).collect()
    }

    /// Get a sample by its name, ignoring case
    pub fn get_sample_by_name(name: &str) -> Result<Sample, AutomatonError> {
        SAMPLES
            .iter()
            .find(|sample| sample.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| AutomatonError::ValidationError(format!("Sample '{}' not found", name)))
    }

    /// Get the sample for a given kind of automaton
    pub fn get_sample_by_kind(kind: AutomatonKind) -> Result<Sample, AutomatonError> {
        SAMPLES
            .iter()
            .find(|sample| sample.kind == kind)
            .cloned()
            .ok_or_else(|| AutomatonError::ValidationError(format!("No sample for {}", kind)))
    }

    /// Builds the automaton of the sample called `name`.
    pub fn build(name: &str) -> Result<Automaton, AutomatonError> {
        Self::get_sample_by_name(name)?.build()
    }
}
