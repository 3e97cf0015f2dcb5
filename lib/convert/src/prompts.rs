//! Prompts sent to the text-generation collaborator.
//!
//! Plain `{placeholder}` markers are filled with `str::replace`; the
//! document skeleton inside the prompt uses real YAML so the model sees
//! the exact target format.

const DESCRIPTION_TO_DOCUMENT: &str = "\
You are an expert workflow designer. Convert the following natural language \
description into a valid workflow document.

Description: {description}

Context:
{context}

Requirements:
1. Create a valid YAML structure for a workflow
2. Include appropriate blocks, connections, and metadata
3. Use realistic block types and configurations
4. Ensure the workflow logically follows the description
5. Add meaningful names and descriptions

The YAML should follow this general structure:
```yaml
name: \"Workflow Name\"
description: \"Brief description\"
version: \"1.0.0\"
blocks:
  - id: \"block_1\"
    type: \"trigger\"
    name: \"Block Name\"
    config: {}
connections:
  - from: \"block_1\"
    to: \"block_2\"
    condition: \"success\"
```

Generate only the YAML content, no additional text or explanations.
";

const DIFF_SUMMARY: &str = "\
You are an expert at analyzing workflow differences. Summarize the changes \
between two workflow documents.

Original:
{original}

Modified:
{modified}

Detected changes:
{changes}

Describe in plain language what changed and why it matters. Ignore \
whitespace and formatting differences. Respond with a short paragraph.
";

/// Builds the description-to-document conversion prompt.
#[must_use]
pub fn description_to_document(description: &str, context: &str) -> String {
    DESCRIPTION_TO_DOCUMENT
        .replace("{description}", description)
        .replace("{context}", context)
}

/// Builds the diff summarization prompt.
#[must_use]
pub fn diff_summary(original: &str, modified: &str, changes: &str) -> String {
    DIFF_SUMMARY
        .replace("{original}", original)
        .replace("{modified}", modified)
        .replace("{changes}", changes)
}
