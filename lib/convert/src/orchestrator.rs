//! Conversion orchestration.
//!
//! The orchestrator is the only component that talks to the
//! text-generation collaborator. It turns natural-language descriptions
//! into document text (with exactly one bounded repair pass when the
//! draft fails validation) and produces diff reports whose advisory
//! summary comes from the collaborator. Generated output is never
//! trusted: everything is re-validated through the document engine.

use crate::error::ConversionError;
use crate::prompts;
use flowdoc_ai::{LlmBackend, LlmRequest};
use flowdoc_document::diff::Change;
use flowdoc_document::validate::ValidationResult;
use flowdoc_document::{diff, parse, validate};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use similar::TextDiff;
use std::sync::Arc;

const CONVERSION_TEMPERATURE: f32 = 0.3;
const CONVERSION_MAX_TOKENS: u32 = 2000;
const SUMMARY_TEMPERATURE: f32 = 0.2;
const SUMMARY_MAX_TOKENS: u32 = 500;

/// The result of one description-to-document conversion.
///
/// A still-invalid result is returned as data; the caller decides
/// whether to accept it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// The final document text.
    pub text: String,
    /// Validation of the final text.
    pub validation: ValidationResult,
    /// Whether the repair pass ran.
    pub repaired: bool,
}

/// A diff between two document texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Unified text diff between the two versions.
    pub diff: String,
    /// Advisory natural-language summary. Never affects the change set.
    pub summary: String,
    /// Structural changes.
    pub changes: Vec<Change>,
    /// Distinct change-type labels in first-seen order.
    pub change_types: Vec<String>,
    /// Complexity score of the modified version minus the original.
    pub complexity_delta: f64,
}

/// The result of a diff-merge request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// The merged text.
    pub text: String,
    /// Findings about the merge.
    pub warnings: Vec<String>,
}

/// Coordinates the document engine with the text-generation collaborator.
#[derive(Clone)]
pub struct ConversionOrchestrator {
    backend: Arc<dyn LlmBackend>,
}

impl ConversionOrchestrator {
    /// Creates an orchestrator over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Converts a natural-language description into document text.
    ///
    /// # Errors
    ///
    /// Fails when the collaborator call fails or its output contains no
    /// extractable document text. A draft that parses but fails
    /// validation is not an error: after one repair pass it is returned
    /// together with its validation result.
    pub async fn describe_to_document(
        &self,
        description: &str,
        context: &JsonValue,
    ) -> Result<ConversionOutcome, ConversionError> {
        tracing::info!(description_len = description.len(), "converting description to document");

        let context_text =
            serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
        let prompt = prompts::description_to_document(description, &context_text);
        let request = LlmRequest::new(prompt)
            .with_temperature(CONVERSION_TEMPERATURE)
            .with_max_tokens(CONVERSION_MAX_TOKENS);
        let response = self.backend.generate(&request).await?;

        let candidate =
            extract_document_text(&response.content).ok_or(ConversionError::NoDocumentText)?;

        let validation = validate::validate_text(&candidate);
        if validation.is_valid {
            return Ok(ConversionOutcome {
                text: candidate,
                validation,
                repaired: false,
            });
        }

        // One bounded repair pass: canonical re-formatting, then a single
        // re-validation. Never retried.
        tracing::warn!(
            errors = validation.errors.len(),
            "generated document failed validation, attempting repair"
        );
        let repaired = parse::canonicalize(&candidate);
        let revalidation = validate::validate_text(&repaired);

        Ok(ConversionOutcome {
            text: repaired,
            validation: revalidation,
            repaired: true,
        })
    }

    /// Diffs two document texts and summarizes the changes.
    ///
    /// # Errors
    ///
    /// Fails when either text does not parse as a document or the
    /// collaborator call fails.
    pub async fn diff_documents(
        &self,
        original_text: &str,
        modified_text: &str,
    ) -> Result<DiffReport, ConversionError> {
        let original = parse::parse_document(original_text)
            .map_err(|err| ConversionError::InvalidDocument { reason: err.to_string() })?;
        let modified = parse::parse_document(modified_text)
            .map_err(|err| ConversionError::InvalidDocument { reason: err.to_string() })?;

        let text_diff = TextDiff::from_lines(original_text, modified_text);
        let unified = text_diff
            .unified_diff()
            .header("original", "modified")
            .to_string();

        let structural = diff::diff(&original, &modified);
        let changes_text = serde_json::to_string_pretty(&structural.changes)
            .unwrap_or_else(|_| "[]".to_string());

        let prompt = prompts::diff_summary(original_text, modified_text, &changes_text);
        let request = LlmRequest::new(prompt)
            .with_temperature(SUMMARY_TEMPERATURE)
            .with_max_tokens(SUMMARY_MAX_TOKENS);
        let summary = self.backend.generate(&request).await?.content;

        tracing::debug!(changes = structural.changes.len(), "diff report built");

        Ok(DiffReport {
            diff: unified,
            summary,
            changes: structural.changes,
            change_types: structural.change_types,
            complexity_delta: structural.complexity_delta,
        })
    }

    /// Applies a previously computed diff back onto a document.
    ///
    /// Merge semantics are a known gap: the original text is returned
    /// unchanged with a warning.
    #[must_use]
    pub fn merge_diff(&self, original_text: &str, _diff: &str) -> MergeOutcome {
        MergeOutcome {
            text: original_text.to_string(),
            warnings: vec!["Diff merge not fully implemented".to_string()],
        }
    }
}

/// Pulls document text out of free-form collaborator output.
///
/// A fenced code block wins; otherwise the contiguous tail starting at
/// the first `name:` or `blocks:` root key is taken. Returns `None`
/// when neither yields non-empty text.
fn extract_document_text(content: &str) -> Option<String> {
    if let Some(fenced) = extract_fenced_block(content) {
        let trimmed = fenced.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    let lines: Vec<&str> = content.lines().collect();
    let start = lines
        .iter()
        .position(|line| line.trim_start().starts_with("name:") || line.trim_start().starts_with("blocks:"))?;
    let tail = lines[start..].join("\n");
    let trimmed = tail.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Returns the body of the first fenced code block, if any.
fn extract_fenced_block(content: &str) -> Option<String> {
    let mut body: Option<Vec<&str>> = None;
    for line in content.lines() {
        match &mut body {
            None => {
                if line.trim_start().starts_with("```") {
                    body = Some(Vec::new());
                }
            }
            Some(lines) => {
                if line.trim_start().starts_with("```") {
                    return Some(lines.join("\n"));
                }
                lines.push(line);
            }
        }
    }
    // Unterminated fence: no block.
    None
}
