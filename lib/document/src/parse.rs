//! Document text parsing and serialization.
//!
//! All functions here are pure. Parsing distinguishes syntax failures
//! (unparsable YAML) from shape failures (YAML whose root is not a
//! document); both are fatal to the calling operation.

use crate::error::ParseError;
use crate::model::Document;
use serde_yaml::Value;

/// Parses text into a raw YAML value tree.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] when the text is not valid YAML.
pub fn parse_value(text: &str) -> Result<Value, ParseError> {
    serde_yaml::from_str(text).map_err(|err| ParseError::Syntax {
        reason: err.to_string(),
    })
}

/// Parses text into a typed [`Document`].
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] for malformed YAML and
/// [`ParseError::Shape`] when the root is not document-shaped.
pub fn parse_document(text: &str) -> Result<Document, ParseError> {
    let value = parse_value(text)?;
    serde_yaml::from_value(value).map_err(|err| ParseError::Shape {
        reason: err.to_string(),
    })
}

/// Serializes a document back to canonical YAML text.
///
/// # Errors
///
/// Returns [`ParseError::Serialize`] when the document cannot be rendered.
pub fn serialize(document: &Document) -> Result<String, ParseError> {
    serde_yaml::to_string(document).map_err(|err| ParseError::Serialize {
        reason: err.to_string(),
    })
}

/// Re-formats document text into canonical form.
///
/// Parses and re-serializes the text, fixing indentation and quoting
/// irregularities. Text that does not parse is returned unchanged; the
/// caller's validator will report the real problem.
#[must_use]
pub fn canonicalize(text: &str) -> String {
    match parse_value(text) {
        Ok(value) => serde_yaml::to_string(&value).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    }
}
