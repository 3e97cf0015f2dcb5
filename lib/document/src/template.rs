//! Template registry and instantiation.
//!
//! Templates are parameterized document skeletons using `{{key}}`
//! placeholders. The registry is built once at startup and shared
//! read-only; instantiation substitutes parameters in a single
//! left-to-right scan (substituted values are never rescanned, so a
//! parameter containing `{{...}}` cannot trigger further substitution)
//! and re-parses the filled text. Unmatched placeholders are left
//! verbatim rather than treated as errors.

use crate::error::TemplateError;
use crate::model::Document;
use crate::parse;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A registered document template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Lookup id.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What this template is for.
    pub description: String,
    /// Listing category.
    pub category: String,
    /// Document skeleton with `{{key}}` placeholders.
    pub body: String,
}

/// Listing entry for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
}

/// A freshly instantiated document.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateOutcome {
    /// The parsed document.
    pub document: Document,
    /// Canonical text of the document.
    pub text: String,
}

const BASIC_AUTOMATION: &str = "\
name: \"{{workflow_name}}\"
description: \"{{workflow_description}}\"
blocks:
  - id: trigger_1
    type: trigger
    name: \"{{trigger_name}}\"
    config: {}
  - id: action_1
    type: action
    name: \"{{action_name}}\"
    config: {}
connections:
  - from: trigger_1
    to: action_1
";

const CONDITIONAL_WORKFLOW: &str = "\
name: \"{{workflow_name}}\"
description: \"{{workflow_description}}\"
blocks:
  - id: trigger_1
    type: trigger
    name: \"{{trigger_name}}\"
    config: {}
  - id: condition_1
    type: condition
    name: \"{{condition_name}}\"
    config:
      condition: \"{{condition_logic}}\"
  - id: action_true
    type: action
    name: \"{{true_action}}\"
    config: {}
  - id: action_false
    type: action
    name: \"{{false_action}}\"
    config: {}
connections:
  - from: trigger_1
    to: condition_1
  - from: condition_1
    to: action_true
    condition: \"true\"
  - from: condition_1
    to: action_false
    condition: \"false\"
";

/// Read-only registry of document templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Creates a registry holding the built-in templates.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Template {
            id: "basic_automation".to_string(),
            name: "Basic Automation".to_string(),
            description: "Simple trigger-action workflow".to_string(),
            category: "general".to_string(),
            body: BASIC_AUTOMATION.to_string(),
        });
        registry.register(Template {
            id: "conditional_workflow".to_string(),
            name: "Conditional Workflow".to_string(),
            description: "Workflow with conditional logic".to_string(),
            category: "general".to_string(),
            body: CONDITIONAL_WORKFLOW.to_string(),
        });
        registry
    }

    /// Registers a template, replacing any existing one with the same id.
    pub fn register(&mut self, template: Template) {
        self.templates.retain(|existing| existing.id != template.id);
        self.templates.push(template);
    }

    /// Looks up a template by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Lists registered templates in registration order.
    #[must_use]
    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.templates
            .iter()
            .map(|template| TemplateSummary {
                id: template.id.clone(),
                name: template.name.clone(),
                description: template.description.clone(),
                category: template.category.clone(),
            })
            .collect()
    }

    /// Known listing categories.
    #[must_use]
    pub fn categories() -> &'static [&'static str] {
        &["general", "automation", "integration", "data_processing"]
    }

    /// Fills a template with the given parameters and parses the result.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownTemplate`] for unregistered ids and
    /// [`TemplateError::RenderFailed`] when the filled text no longer
    /// parses as a document.
    pub fn instantiate(
        &self,
        id: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<TemplateOutcome, TemplateError> {
        let template = self.get(id).ok_or_else(|| TemplateError::UnknownTemplate {
            id: id.to_string(),
        })?;

        let filled = fill_placeholders(&template.body, parameters);
        let document = parse::parse_document(&filled).map_err(|err| TemplateError::RenderFailed {
            id: id.to_string(),
            reason: err.to_string(),
        })?;
        let text = parse::serialize(&document).map_err(|err| TemplateError::RenderFailed {
            id: id.to_string(),
            reason: err.to_string(),
        })?;

        Ok(TemplateOutcome { document, text })
    }
}

/// Substitutes `{{identifier}}` tokens in a single left-to-right scan.
///
/// Identifiers are ASCII alphanumerics and underscores. Tokens with no
/// matching parameter, and `{{` pairs that never close as a token, are
/// copied through verbatim.
fn fill_placeholders(body: &str, parameters: &HashMap<String, String>) -> String {
    let mut output = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match placeholder_name(after_open) {
            Some(name) => {
                let token_len = 2 + name.len() + 2;
                match parameters.get(name) {
                    Some(value) => output.push_str(value),
                    None => output.push_str(&rest[start..start + token_len]),
                }
                rest = &rest[start + token_len..];
            }
            None => {
                output.push_str("{{");
                rest = &rest[start + 2..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// Returns the identifier when `text` starts with `identifier}}`.
fn placeholder_name(text: &str) -> Option<&str> {
    let end = text.find("}}")?;
    let name = &text[..end];
    let valid = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    valid.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn basic_automation_instantiates_valid_document() {
        let registry = TemplateRegistry::builtin();
        let outcome = registry
            .instantiate(
                "basic_automation",
                &params(&[
                    ("workflow_name", "Nightly Backup"),
                    ("workflow_description", "Back up the database"),
                    ("trigger_name", "Every night"),
                    ("action_name", "Run backup"),
                ]),
            )
            .expect("instantiate");

        assert_eq!(outcome.document.name, "Nightly Backup");
        assert_eq!(outcome.document.blocks.len(), 2);
        assert!(validate::validate_document(&outcome.document).is_valid);
    }

    #[test]
    fn conditional_workflow_carries_edge_labels() {
        let registry = TemplateRegistry::builtin();
        let outcome = registry
            .instantiate(
                "conditional_workflow",
                &params(&[
                    ("workflow_name", "Triage"),
                    ("workflow_description", "Route by severity"),
                    ("trigger_name", "On alert"),
                    ("condition_name", "Is critical?"),
                    ("condition_logic", "severity == critical"),
                    ("true_action", "Page on-call"),
                    ("false_action", "File ticket"),
                ]),
            )
            .expect("instantiate");

        assert_eq!(outcome.document.blocks.len(), 4);
        let labels: Vec<_> = outcome
            .document
            .connections
            .iter()
            .filter_map(|c| c.condition.as_deref())
            .collect();
        assert_eq!(labels, ["true", "false"]);
        assert!(validate::validate_document(&outcome.document).is_valid);
    }

    #[test]
    fn unknown_template_is_an_error() {
        let registry = TemplateRegistry::builtin();
        let err = registry
            .instantiate("no_such_template", &HashMap::new())
            .expect_err("must fail");
        assert_eq!(
            err,
            TemplateError::UnknownTemplate {
                id: "no_such_template".to_string()
            }
        );
    }

    #[test]
    fn unmatched_placeholders_stay_verbatim() {
        let registry = TemplateRegistry::builtin();
        let outcome = registry
            .instantiate("basic_automation", &params(&[("workflow_name", "Partial")]))
            .expect("instantiate");

        assert_eq!(outcome.document.name, "Partial");
        assert_eq!(
            outcome.document.description.as_deref(),
            Some("{{workflow_description}}")
        );
    }

    #[test]
    fn substituted_values_are_never_rescanned() {
        let filled = fill_placeholders(
            "hello {{who}}",
            &params(&[("who", "{{who}} again"), ("again", "nope")]),
        );
        assert_eq!(filled, "hello {{who}} again");
    }

    #[test]
    fn malformed_tokens_are_copied_through() {
        let filled = fill_placeholders("a {{not closed and {{x}} done", &params(&[("x", "X")]));
        assert_eq!(filled, "a {{not closed and X done");
    }

    #[test]
    fn summaries_and_categories() {
        let registry = TemplateRegistry::builtin();
        let summaries = registry.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "basic_automation");
        assert_eq!(summaries[1].name, "Conditional Workflow");
        assert!(TemplateRegistry::categories().contains(&"general"));
    }
}
