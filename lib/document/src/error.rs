//! Error types for the document engine.
//!
//! Parsing and template lookup fail fast; validation findings are returned
//! as data (see [`crate::validate::ValidationResult`]), and layout failures
//! are recovered internally by falling back to the grid algorithm.

use std::fmt;

/// Errors from turning text into a document or back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text is not valid YAML.
    Syntax { reason: String },
    /// The text parsed, but the root does not have the document shape.
    Shape { reason: String },
    /// A document could not be rendered back to text.
    Serialize { reason: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { reason } => {
                write!(f, "YAML parsing error: {reason}")
            }
            Self::Shape { reason } => {
                write!(f, "document has an invalid shape: {reason}")
            }
            Self::Serialize { reason } => {
                write!(f, "document serialization failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors from template instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// No template is registered under the given id.
    UnknownTemplate { id: String },
    /// The filled template no longer parses as a document.
    RenderFailed { id: String, reason: String },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTemplate { id } => {
                write!(f, "unknown template: {id}")
            }
            Self::RenderFailed { id, reason } => {
                write!(f, "template '{id}' rendered an invalid document: {reason}")
            }
        }
    }
}

impl std::error::Error for TemplateError {}
