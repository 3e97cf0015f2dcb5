//! Structural diffing between two documents.
//!
//! The diff is a field-level change set: top-level scalar changes, blocks
//! added or removed (keyed by id), and key-wise field diffs for blocks
//! present on both sides. Connections are not diffed. The advisory
//! natural-language summary is produced elsewhere; nothing here touches
//! the text-generation collaborator.

use crate::complexity;
use crate::model::{Block, Document};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// One semantic change between two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Change {
    /// A top-level scalar field changed.
    FieldChange {
        field: String,
        old_value: Option<String>,
        new_value: Option<String>,
    },
    /// A block id appears only in the modified document.
    BlockAdded {
        block_id: String,
        block_type: Option<String>,
        block_name: Option<String>,
    },
    /// A block id appears only in the original document.
    BlockRemoved {
        block_id: String,
        block_type: Option<String>,
        block_name: Option<String>,
    },
    /// A block present on both sides has differing content.
    BlockModified {
        block_id: String,
        field_diffs: Vec<FieldDiff>,
    },
}

impl Change {
    /// Returns the change-type label used in [`DiffResult::change_types`].
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::FieldChange { .. } => "field_change",
            Self::BlockAdded { .. } => "block_added",
            Self::BlockRemoved { .. } => "block_removed",
            Self::BlockModified { .. } => "block_modified",
        }
    }
}

/// How a single block field differs between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDiffKind {
    Added,
    Removed,
    Modified,
}

/// A key-wise difference within one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub kind: FieldDiffKind,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// The change set between two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    /// All changes: top-level fields first, then added, removed and
    /// modified blocks, each in declaration order.
    pub changes: Vec<Change>,
    /// Distinct change-type labels in first-seen order.
    pub change_types: Vec<String>,
    /// `score(modified) - score(original)`.
    pub complexity_delta: f64,
}

/// Computes the structural diff between two documents.
#[must_use]
pub fn diff(original: &Document, modified: &Document) -> DiffResult {
    let mut changes = Vec::new();

    push_field_change(&mut changes, "name", Some(&original.name), Some(&modified.name));
    push_field_change(
        &mut changes,
        "description",
        original.description.as_ref(),
        modified.description.as_ref(),
    );
    push_field_change(
        &mut changes,
        "version",
        original.version.as_ref(),
        modified.version.as_ref(),
    );

    for block in &modified.blocks {
        if original.block(&block.id).is_none() {
            changes.push(Change::BlockAdded {
                block_id: block.id.clone(),
                block_type: block.kind.clone(),
                block_name: block.name.clone(),
            });
        }
    }

    for block in &original.blocks {
        if modified.block(&block.id).is_none() {
            changes.push(Change::BlockRemoved {
                block_id: block.id.clone(),
                block_type: block.kind.clone(),
                block_name: block.name.clone(),
            });
        }
    }

    for block in &original.blocks {
        if let Some(other) = modified.block(&block.id)
            && block != other
        {
            changes.push(Change::BlockModified {
                block_id: block.id.clone(),
                field_diffs: compare_blocks(block, other),
            });
        }
    }

    let change_types = distinct_labels(&changes);
    let complexity_delta = complexity::score(modified) - complexity::score(original);

    DiffResult {
        changes,
        change_types,
        complexity_delta,
    }
}

fn push_field_change(
    changes: &mut Vec<Change>,
    field: &str,
    old: Option<&String>,
    new: Option<&String>,
) {
    if old != new {
        changes.push(Change::FieldChange {
            field: field.to_string(),
            old_value: old.cloned(),
            new_value: new.cloned(),
        });
    }
}

fn distinct_labels(changes: &[Change]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for change in changes {
        let label = change.label();
        if !labels.iter().any(|seen| seen == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

/// Key-wise comparison of two blocks sharing an id.
fn compare_blocks(original: &Block, modified: &Block) -> Vec<FieldDiff> {
    let original_fields = block_fields(original);
    let modified_fields = block_fields(modified);
    let mut diffs = Vec::new();

    for (field, old_value) in &original_fields {
        match modified_fields.iter().find(|(name, _)| name == field) {
            Some((_, new_value)) if new_value != old_value => diffs.push(FieldDiff {
                field: (*field).to_string(),
                kind: FieldDiffKind::Modified,
                old_value: Some(old_value.clone()),
                new_value: Some(new_value.clone()),
            }),
            Some(_) => {}
            None => diffs.push(FieldDiff {
                field: (*field).to_string(),
                kind: FieldDiffKind::Removed,
                old_value: Some(old_value.clone()),
                new_value: None,
            }),
        }
    }

    for (field, new_value) in &modified_fields {
        if !original_fields.iter().any(|(name, _)| name == field) {
            diffs.push(FieldDiff {
                field: (*field).to_string(),
                kind: FieldDiffKind::Added,
                old_value: None,
                new_value: Some(new_value.clone()),
            });
        }
    }

    diffs
}

/// A block's populated fields as ordered key/value pairs.
fn block_fields(block: &Block) -> Vec<(&'static str, Value)> {
    let mut fields = vec![("id", Value::String(block.id.clone()))];
    if let Some(kind) = &block.kind {
        fields.push(("type", Value::String(kind.clone())));
    }
    if let Some(name) = &block.name {
        fields.push(("name", Value::String(name.clone())));
    }
    if !block.config.is_empty() {
        fields.push(("config", Value::Mapping(block.config.clone())));
    }
    if let Some(position) = &block.position {
        let mut mapping = serde_yaml::Mapping::new();
        mapping.insert("x".into(), position.x.into());
        mapping.insert("y".into(), position.y.into());
        fields.push(("position", Value::Mapping(mapping)));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Connection, Document};

    fn chain() -> Document {
        Document::new("W")
            .with_block(Block::new("t1", "trigger").with_name("Start"))
            .with_block(Block::new("a1", "action").with_name("Act"))
            .with_connection(Connection::new("t1", "a1"))
    }

    #[test]
    fn identical_documents_diff_empty() {
        let document = chain();
        let result = diff(&document, &document);
        assert!(result.changes.is_empty());
        assert!(result.change_types.is_empty());
        assert_eq!(result.complexity_delta, 0.0);
    }

    #[test]
    fn top_level_field_changes_are_reported() {
        let original = chain();
        let modified = chain().with_description("now documented").with_version("2.0.0");
        // with_* on a fresh chain keeps blocks identical.
        let result = diff(&original, &modified);

        assert_eq!(result.change_types, vec!["field_change"]);
        assert_eq!(result.changes.len(), 2);
        assert!(matches!(
            &result.changes[0],
            Change::FieldChange { field, old_value: None, new_value: Some(new) }
                if field == "description" && new == "now documented"
        ));
    }

    #[test]
    fn renamed_block_id_reports_add_and_remove() {
        // A renamed id is a remove plus an add; the stale connection is
        // not diffed and not validated.
        let original = chain();
        let mut modified = chain();
        modified.blocks[1].id = "a2".to_string();

        let result = diff(&original, &modified);
        assert!(result.changes.iter().any(|change| matches!(
            change,
            Change::BlockAdded { block_id, .. } if block_id == "a2"
        )));
        assert!(result.changes.iter().any(|change| matches!(
            change,
            Change::BlockRemoved { block_id, .. } if block_id == "a1"
        )));
        assert_eq!(result.complexity_delta, 0.0);
    }

    #[test]
    fn add_remove_labels_invert_when_roles_swap() {
        let smaller = chain();
        let larger = chain().with_block(Block::new("c1", "condition"));

        let forward = diff(&smaller, &larger);
        assert_eq!(forward.change_types, vec!["block_added"]);
        assert!(forward.complexity_delta > 0.0);

        let backward = diff(&larger, &smaller);
        assert_eq!(backward.change_types, vec!["block_removed"]);
        assert_eq!(backward.complexity_delta, -forward.complexity_delta);
    }

    #[test]
    fn modified_block_reports_field_diffs() {
        let original = chain();
        let mut modified = chain();
        modified.blocks[1].name = Some("Renamed".to_string());
        modified.blocks[1]
            .config
            .insert("retries".into(), Value::Number(3.into()));

        let result = diff(&original, &modified);
        assert_eq!(result.change_types, vec!["block_modified"]);

        let Change::BlockModified { block_id, field_diffs } = &result.changes[0] else {
            panic!("expected a block modification");
        };
        assert_eq!(block_id, "a1");

        let name_diff = field_diffs.iter().find(|d| d.field == "name").expect("name diff");
        assert_eq!(name_diff.kind, FieldDiffKind::Modified);
        assert_eq!(name_diff.old_value, Some(Value::String("Act".to_string())));

        let config_diff = field_diffs.iter().find(|d| d.field == "config").expect("config diff");
        assert_eq!(config_diff.kind, FieldDiffKind::Added);
    }

    #[test]
    fn dropped_block_field_is_a_removal() {
        let original = chain();
        let mut modified = chain();
        modified.blocks[0].name = None;

        let result = diff(&original, &modified);
        let Change::BlockModified { field_diffs, .. } = &result.changes[0] else {
            panic!("expected a block modification");
        };
        assert_eq!(field_diffs.len(), 1);
        assert_eq!(field_diffs[0].field, "name");
        assert_eq!(field_diffs[0].kind, FieldDiffKind::Removed);
        assert_eq!(field_diffs[0].new_value, None);
    }

    #[test]
    fn complexity_delta_tracks_scorer() {
        let original = Document::new("W").with_block(Block::new("t1", "trigger"));
        let modified = Document::new("W")
            .with_block(Block::new("t1", "trigger"))
            .with_block(Block::new("l1", "loop"));

        let result = diff(&original, &modified);
        // One loop block adds 1.0 + 2.0.
        assert!((result.complexity_delta - 3.0).abs() < 1e-9);
    }
}
