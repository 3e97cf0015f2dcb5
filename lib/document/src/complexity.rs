//! Complexity scoring.
//!
//! The score combines block count, connection count and per-type weights:
//! `blocks * 1.0 + connections * 0.5 + sum(weight(type))`. Deterministic
//! and monotonically non-decreasing as blocks or connections are added.

use crate::model::Document;

const BLOCK_WEIGHT: f64 = 1.0;
const CONNECTION_WEIGHT: f64 = 0.5;

/// Returns the scoring weight for a block type.
///
/// Unrecognized types weigh 1.0. A block with no declared type is scored
/// as an `action`.
#[must_use]
pub fn type_weight(kind: Option<&str>) -> f64 {
    match kind.unwrap_or("action") {
        "trigger" => 1.0,
        "action" => 1.2,
        "condition" => 1.5,
        "loop" => 2.0,
        "parallel" => 1.8,
        _ => 1.0,
    }
}

/// Computes the complexity score of a document.
#[must_use]
pub fn score(document: &Document) -> f64 {
    let block_score = document.blocks.len() as f64 * BLOCK_WEIGHT;
    let connection_score = document.connections.len() as f64 * CONNECTION_WEIGHT;
    let type_score: f64 = document
        .blocks
        .iter()
        .map(|block| type_weight(block.kind.as_deref()))
        .sum();

    block_score + connection_score + type_score
}
