//! Descriptive metadata extraction.

use crate::complexity;
use crate::model::Document;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary fields derived from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub description: String,
    pub total_blocks: usize,
    pub total_connections: usize,
    /// Count of blocks per declared type; blocks with no type are counted
    /// under `unknown`.
    pub block_types: HashMap<String, usize>,
    pub has_triggers: bool,
    pub has_conditions: bool,
    pub has_loops: bool,
    pub complexity_score: f64,
}

/// Derives summary metadata from a document.
#[must_use]
pub fn extract(document: &Document) -> DocumentMetadata {
    let mut block_types: HashMap<String, usize> = HashMap::new();
    for block in &document.blocks {
        let kind = block.kind.as_deref().unwrap_or("unknown");
        *block_types.entry(kind.to_string()).or_insert(0) += 1;
    }

    let has_kind =
        |kind: &str| document.blocks.iter().any(|block| block.kind.as_deref() == Some(kind));

    DocumentMetadata {
        name: document.name.clone(),
        description: document.description.clone().unwrap_or_default(),
        total_blocks: document.blocks.len(),
        total_connections: document.connections.len(),
        block_types,
        has_triggers: has_kind("trigger"),
        has_conditions: has_kind("condition"),
        has_loops: has_kind("loop"),
        complexity_score: complexity::score(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Connection, Document};

    #[test]
    fn extracts_histogram_and_flags() {
        let document = Document::new("Mixed")
            .with_description("A bit of everything")
            .with_block(Block::new("t1", "trigger"))
            .with_block(Block::new("c1", "condition"))
            .with_block(Block::new("a1", "action"))
            .with_block(Block::new("a2", "action"))
            .with_connection(Connection::new("t1", "c1"));

        let metadata = extract(&document);
        assert_eq!(metadata.name, "Mixed");
        assert_eq!(metadata.description, "A bit of everything");
        assert_eq!(metadata.total_blocks, 4);
        assert_eq!(metadata.total_connections, 1);
        assert_eq!(metadata.block_types.get("action"), Some(&2));
        assert_eq!(metadata.block_types.get("trigger"), Some(&1));
        assert!(metadata.has_triggers);
        assert!(metadata.has_conditions);
        assert!(!metadata.has_loops);
    }

    #[test]
    fn untyped_blocks_count_as_unknown() {
        let mut block = Block::new("x1", "action");
        block.kind = None;
        let metadata = extract(&Document::new("W").with_block(block));
        assert_eq!(metadata.block_types.get("unknown"), Some(&1));
    }

    #[test]
    fn complexity_delegates_to_scorer() {
        let document = Document::new("Loop").with_block(Block::new("l1", "loop"));
        let metadata = extract(&document);
        assert_eq!(metadata.complexity_score, complexity::score(&document));
        assert_eq!(metadata.complexity_score, 3.0);
    }

    #[test]
    fn empty_document_metadata() {
        let metadata = extract(&Document::new("Empty"));
        assert_eq!(metadata.total_blocks, 0);
        assert!(metadata.block_types.is_empty());
        assert_eq!(metadata.description, "");
    }
}
