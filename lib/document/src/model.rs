//! Workflow document types.
//!
//! A document is a named collection of blocks (nodes) and connections
//! (directed edges between block ids). Fields the engine never inspects
//! (`config`, `metadata`, `triggers`) are kept as opaque YAML values so
//! they round-trip byte-for-byte through parse and serialize.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Version applied when a document does not declare one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// A 2-D coordinate assigned to a block by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single node in a workflow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Identifier, unique within a document.
    pub id: String,
    /// Block type. Recognized values are `trigger`, `action`, `condition`,
    /// `loop` and `parallel`; anything else is accepted as-is. A missing
    /// type is scored with the `action` weight.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human-readable name. Recommended but not required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Opaque block configuration.
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub config: Mapping,
    /// Coordinates assigned by the layout engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Block {
    /// Creates a new block with the given id and type.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind.into()),
            name: None,
            config: Mapping::new(),
            position: None,
        }
    }

    /// Sets the block name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a configuration entry.
    #[must_use]
    pub fn with_config_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(Value::String(key.into()), value);
        self
    }

    /// Returns whether this block is a trigger.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.kind.as_deref() == Some("trigger")
    }
}

/// A directed edge between two block ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Source block id.
    pub from: String,
    /// Target block id.
    pub to: String,
    /// Optional edge label, e.g. `"true"`, `"false"`, `"success"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Connection {
    /// Creates a new connection.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            condition: None,
        }
    }

    /// Sets the edge label.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// A complete workflow document.
///
/// Documents are immutable from the engine's perspective: operations that
/// would change one (such as applying a layout) return a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document name.
    pub name: String,
    /// Description of what this workflow does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared version, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Blocks in declaration order. May be empty.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Connections in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<Connection>,
    /// Opaque trigger descriptors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Value>,
    /// Opaque document metadata.
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub metadata: Mapping,
}

impl Document {
    /// Creates a new document with the given name and no blocks.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: None,
            blocks: Vec::new(),
            connections: Vec::new(),
            triggers: Vec::new(),
            metadata: Mapping::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a block.
    #[must_use]
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Adds a connection.
    #[must_use]
    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Returns the declared version, or [`DEFAULT_VERSION`].
    #[must_use]
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// Returns the block with the given id, if any.
    #[must_use]
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    /// Returns whether any block is a trigger.
    #[must_use]
    pub fn has_trigger(&self) -> bool {
        self.blocks.iter().any(Block::is_trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_builder() {
        let document = Document::new("Daily Digest")
            .with_description("Summarize the inbox each morning")
            .with_block(Block::new("t1", "trigger").with_name("Every morning"))
            .with_block(Block::new("a1", "action"))
            .with_connection(Connection::new("t1", "a1"));

        assert_eq!(document.name, "Daily Digest");
        assert_eq!(document.blocks.len(), 2);
        assert_eq!(document.connections.len(), 1);
        assert!(document.has_trigger());
        assert!(document.block("a1").is_some());
        assert!(document.block("missing").is_none());
    }

    #[test]
    fn version_defaults() {
        let document = Document::new("W");
        assert_eq!(document.version_or_default(), "1.0.0");

        let versioned = Document::new("W").with_version("2.1.0");
        assert_eq!(versioned.version_or_default(), "2.1.0");
    }

    #[test]
    fn block_trigger_detection() {
        assert!(Block::new("t1", "trigger").is_trigger());
        assert!(!Block::new("a1", "action").is_trigger());

        let untyped = Block {
            id: "x".to_string(),
            kind: None,
            name: None,
            config: Mapping::new(),
            position: None,
        };
        assert!(!untyped.is_trigger());
    }

    #[test]
    fn connection_condition_label() {
        let connection = Connection::new("c1", "a1").with_condition("true");
        assert_eq!(connection.condition.as_deref(), Some("true"));
    }
}
