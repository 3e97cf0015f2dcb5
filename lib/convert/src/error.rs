//! Error types for conversion orchestration.

use flowdoc_ai::LlmError;
use std::fmt;

/// Errors from description-to-document conversion and diff summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The collaborator's output contained no extractable document text.
    NoDocumentText,
    /// An input document did not parse.
    InvalidDocument { reason: String },
    /// The collaborator call itself failed.
    Llm(LlmError),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocumentText => {
                write!(f, "no document text found in generated output")
            }
            Self::InvalidDocument { reason } => {
                write!(f, "input document is invalid: {reason}")
            }
            Self::Llm(err) => write!(f, "collaborator call failed: {err}"),
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<LlmError> for ConversionError {
    fn from(err: LlmError) -> Self {
        Self::Llm(err)
    }
}
