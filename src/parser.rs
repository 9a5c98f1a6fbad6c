//! This module provides the parser for rules documents, utilizing the `pest` crate.
//! Rules are JSON documents that may carry `//` line comments and `/* */` block comments;
//! the grammar in `grammar.pest` separates comments from strings so they can be dropped
//! before the JSON itself is handed to `serde_json`.

use crate::types::{AutomatonError, MAX_RULES_SIZE};
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;
use serde_json::Value;

/// Derives a `PestParser` for the commented JSON grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct RulesParser;

/// Parses a rules document into a JSON value.
///
/// This is the main entry point for reading rules. The document is size checked,
/// stripped of comments, and then parsed as JSON. No automaton-specific validation
/// happens here; see the `new` constructors of each simulator for that.
///
/// # Returns
///
/// * `Ok(Value)` if the input is well-formed commented JSON.
/// * `Err(AutomatonError::ParseError)` if a comment or string is left unterminated.
/// * `Err(AutomatonError::InvalidDocument)` if the remaining text is not valid JSON.
pub fn parse(input: &str) -> Result<Value, AutomatonError> {
    if input.len() > MAX_RULES_SIZE {
        return Err(AutomatonError::ValidationError(format!(
            "Rules document is {} bytes, the limit is {} bytes",
            input.len(),
            MAX_RULES_SIZE
        )));
    }

    let json = strip_comments(input)?;

    serde_json::from_str(&json).map_err(|e| AutomatonError::InvalidDocument(e.to_string()))
}

/// Removes every comment from `input`, leaving strings and all other text untouched.
///
/// Line comments stop before the newline, so line numbers reported by the JSON
/// parser still match the input.
pub fn strip_comments(input: &str) -> Result<String, AutomatonError> {
    let document = RulesParser::parse(Rule::document, input)
        .map_err(|e| AutomatonError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| AutomatonError::InvalidDocument("Empty rules document".to_string()))?;

    let mut output = String::with_capacity(input.len());
    for pair in document.into_inner() {
        match pair.as_rule() {
            Rule::string | Rule::text => output.push_str(pair.as_str()),
            _ => {} // Comments and EOI
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_line_and_block_comments() {
        let input = r#"{
  // the states
  "states": ["q0", /* inline */ "q1"]
}"#;

        let stripped = strip_comments(input).unwrap();
        assert_eq!(stripped, "{\n  \n  \"states\": [\"q0\",  \"q1\"]\n}");
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        let input = r#"{"url": "http://example.com/*x*/"} // trailing"#;

        let stripped = strip_comments(input).unwrap();
        assert_eq!(stripped, r#"{"url": "http://example.com/*x*/"} "#);
    }

    #[test]
    fn test_escaped_quotes_do_not_end_strings() {
        let input = r#"{"a": "say \"//hi\""}"#;

        let stripped = strip_comments(input).unwrap();
        assert_eq!(stripped, input);
    }

    #[test]
    fn test_parse_commented_document() {
        let input = r#"
/* DFA rules */
{
  "start_state": "q0", // where we begin
  "final_states": "q0"
}
"#;

        let value = parse(input).unwrap();
        assert_eq!(value, json!({"start_state": "q0", "final_states": "q0"}));
    }

    #[test]
    fn test_parse_unterminated_block_comment() {
        let result = parse(r#"{"states": []} /* never closed"#);

        assert!(matches!(result, Err(AutomatonError::ParseError(_))));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse(r#"{"states": [}"#);

        assert!(matches!(result, Err(AutomatonError::InvalidDocument(_))));
    }

    #[test]
    fn test_parse_oversized_document() {
        let input = format!("[{}]", " ".repeat(MAX_RULES_SIZE));
        let error = parse(&input).unwrap_err();

        assert!(matches!(error, AutomatonError::ValidationError(_)));
        assert!(error.to_string().contains("limit"));
    }
}
