//! Structural validation.
//!
//! Validation never fails as an error: every rule violation is collected
//! into a [`ValidationResult`] so callers can show all problems at once.
//! The rules run over the raw value tree rather than the typed model so
//! that shape problems (a block without an id, `blocks` that is not a
//! sequence) are reported as findings instead of decode failures.
//!
//! Connection endpoints are deliberately not checked against block ids;
//! a connection naming a missing block passes validation unchanged.

use crate::model::Document;
use crate::parse;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// The outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no errors were found. Warnings never affect validity.
    pub is_valid: bool,
    /// Rule violations, in rule order.
    pub errors: Vec<String>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
    /// Number of entries in `blocks` (0 when absent or malformed).
    pub block_count: usize,
    /// Number of entries in `connections` (0 when absent or malformed).
    pub connection_count: usize,
    /// Whether any block has type `trigger`.
    pub has_trigger: bool,
}

impl ValidationResult {
    fn fatal(error: String) -> Self {
        Self {
            is_valid: false,
            errors: vec![error],
            warnings: Vec::new(),
            block_count: 0,
            connection_count: 0,
            has_trigger: false,
        }
    }
}

/// Validates document text.
///
/// Text that does not parse yields a single fatal error carrying the
/// parser's message.
#[must_use]
pub fn validate_text(text: &str) -> ValidationResult {
    let value = match parse::parse_value(text) {
        Ok(value) => value,
        Err(err) => return ValidationResult::fatal(err.to_string()),
    };
    validate_value(&value)
}

/// Validates an already-parsed document.
///
/// The document is serialized and validated as text, so the same rule set
/// and messages apply to both entry points.
#[must_use]
pub fn validate_document(document: &Document) -> ValidationResult {
    match parse::serialize(document) {
        Ok(text) => validate_text(&text),
        Err(err) => ValidationResult::fatal(err.to_string()),
    }
}

fn validate_value(root: &Value) -> ValidationResult {
    if root.as_mapping().is_none() {
        return ValidationResult::fatal("Root element must be an object".to_string());
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut has_trigger = false;

    if root.get("name").is_none() {
        errors.push("Missing required field: name".to_string());
    }

    match root.get("blocks") {
        None => errors.push("Missing required field: blocks".to_string()),
        Some(blocks) => match blocks.as_sequence() {
            None => errors.push("Field 'blocks' must be an array".to_string()),
            Some(blocks) => {
                let mut seen_ids: Vec<&Value> = Vec::new();
                for (i, block) in blocks.iter().enumerate() {
                    if block.as_mapping().is_none() {
                        errors.push(format!("Block {i} must be an object"));
                        continue;
                    }

                    match block.get("id") {
                        None => errors.push(format!("Block {i} missing required field: id")),
                        Some(id) => {
                            if seen_ids.contains(&id) {
                                errors.push(format!("Duplicate block ID: {}", scalar_text(id)));
                            }
                            seen_ids.push(id);
                        }
                    }

                    match block.get("type") {
                        None => errors.push(format!("Block {i} missing required field: type")),
                        Some(kind) => {
                            if kind.as_str() == Some("trigger") {
                                has_trigger = true;
                            }
                        }
                    }

                    if block.get("name").is_none() {
                        warnings.push(format!("Block {i} missing recommended field: name"));
                    }
                }

                if !has_trigger {
                    warnings.push("Workflow has no trigger blocks".to_string());
                }
            }
        },
    }

    if let Some(connections) = root.get("connections") {
        match connections.as_sequence() {
            None => errors.push("Field 'connections' must be an array".to_string()),
            Some(connections) => {
                for (i, connection) in connections.iter().enumerate() {
                    if connection.as_mapping().is_none() {
                        errors.push(format!("Connection {i} must be an object"));
                        continue;
                    }
                    if connection.get("from").is_none() {
                        errors.push(format!("Connection {i} missing required field: from"));
                    }
                    if connection.get("to").is_none() {
                        errors.push(format!("Connection {i} missing required field: to"));
                    }
                }
            }
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        block_count: sequence_len(root.get("blocks")),
        connection_count: sequence_len(root.get("connections")),
        has_trigger,
    }
}

fn sequence_len(value: Option<&Value>) -> usize {
    value
        .and_then(Value::as_sequence)
        .map_or(0, |sequence| sequence.len())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Connection, Document};

    #[test]
    fn valid_trigger_action_document() {
        // Two blocks joined by one connection validate with no findings.
        let text = "\
name: W
blocks:
  - id: t1
    type: trigger
    name: Start
  - id: a1
    type: action
    name: Act
connections:
  - from: t1
    to: a1
";
        let result = validate_text(text);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.block_count, 2);
        assert_eq!(result.connection_count, 1);
        assert!(result.has_trigger);
    }

    #[test]
    fn unparsable_text_is_a_single_fatal_error() {
        let result = validate_text("name: [unclosed");
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("YAML parsing error:"));
        assert_eq!(result.block_count, 0);
    }

    #[test]
    fn non_mapping_root_is_fatal() {
        let result = validate_text("- a\n- b\n");
        assert_eq!(result.errors, vec!["Root element must be an object"]);
    }

    #[test]
    fn missing_name_and_blocks_are_both_reported() {
        let result = validate_text("version: 1.0.0\n");
        assert!(!result.is_valid);
        assert!(result.errors.contains(&"Missing required field: name".to_string()));
        assert!(result.errors.contains(&"Missing required field: blocks".to_string()));
    }

    #[test]
    fn blocks_must_be_a_sequence() {
        let result = validate_text("name: W\nblocks: not-a-list\n");
        assert!(result.errors.contains(&"Field 'blocks' must be an array".to_string()));
        assert_eq!(result.block_count, 0);
    }

    #[test]
    fn block_findings_accumulate() {
        let text = "\
name: W
blocks:
  - id: a1
    type: action
  - id: a1
    name: Duplicate
  - type: action
";
        let result = validate_text(text);
        assert!(!result.is_valid);
        assert!(result.errors.contains(&"Duplicate block ID: a1".to_string()));
        assert!(result.errors.contains(&"Block 1 missing required field: type".to_string()));
        assert!(result.errors.contains(&"Block 2 missing required field: id".to_string()));
        assert!(result.warnings.contains(&"Block 0 missing recommended field: name".to_string()));
        assert!(result.warnings.contains(&"Workflow has no trigger blocks".to_string()));
    }

    #[test]
    fn no_trigger_warning_does_not_affect_validity() {
        let text = "\
name: W
blocks:
  - id: a1
    type: action
    name: Only
";
        let result = validate_text(text);
        assert!(result.is_valid);
        assert_eq!(result.warnings, vec!["Workflow has no trigger blocks"]);
        assert!(!result.has_trigger);
    }

    #[test]
    fn connection_fields_are_required() {
        let text = "\
name: W
blocks:
  - id: t1
    type: trigger
    name: Start
connections:
  - from: t1
  - to: t1
  - plain string
";
        let result = validate_text(text);
        assert!(result.errors.contains(&"Connection 0 missing required field: to".to_string()));
        assert!(result.errors.contains(&"Connection 1 missing required field: from".to_string()));
        assert!(result.errors.contains(&"Connection 2 must be an object".to_string()));
        assert_eq!(result.connection_count, 3);
    }

    #[test]
    fn dangling_connection_endpoints_pass_validation() {
        // Endpoint existence is intentionally unchecked.
        let text = "\
name: W
blocks:
  - id: t1
    type: trigger
    name: Start
connections:
  - from: t1
    to: nowhere
";
        let result = validate_text(text);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn typed_document_roundtrip_is_valid() {
        let document = Document::new("Roundtrip")
            .with_block(Block::new("t1", "trigger").with_name("Start"))
            .with_block(Block::new("a1", "action").with_name("Act"))
            .with_connection(Connection::new("t1", "a1"));

        let result = validate_document(&document);
        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert_eq!(result.block_count, 2);
        assert!(result.has_trigger);
    }
}
