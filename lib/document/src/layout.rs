//! Automatic block layout.
//!
//! Three selectable algorithms assign one coordinate pair per block:
//! hierarchical (levelled by longest path from the entry blocks),
//! force-directed (spring simulation), and grid. Hierarchical and
//! force-directed fall back to the grid when they cannot produce a
//! result; the outcome reports which algorithm actually ran. The
//! deterministic algorithms never place two blocks at the same point;
//! force-directed makes no such guarantee.

use crate::error::ParseError;
use crate::graph::DocumentGraph;
use crate::model::{Document, Position};
use crate::parse;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

const HORIZONTAL_SPACING: f64 = 200.0;
const VERTICAL_SPACING: f64 = 150.0;
const FORCE_ITERATIONS: usize = 50;
const FORCE_SCALE: f64 = 300.0;

/// Selectable layout algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    Hierarchical,
    ForceDirected,
    Grid,
}

impl LayoutAlgorithm {
    /// Maps an algorithm name to a variant; unrecognized names select the
    /// grid algorithm.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "hierarchical" => Self::Hierarchical,
            "force_directed" => Self::ForceDirected,
            _ => Self::Grid,
        }
    }

    /// The algorithm's wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hierarchical => "hierarchical",
            Self::ForceDirected => "force_directed",
            Self::Grid => "grid",
        }
    }
}

impl std::fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The positions produced by one layout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOutcome {
    /// One coordinate pair per block id.
    pub positions: HashMap<String, Position>,
    /// The algorithm that actually ran, after any fallback.
    pub algorithm_used: LayoutAlgorithm,
}

/// Full report from laying out document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// The document re-serialized with positions applied.
    pub text: String,
    pub positions: HashMap<String, Position>,
    pub total_blocks: usize,
    pub algorithm_used: LayoutAlgorithm,
    pub execution_time_ms: f64,
}

/// Assigns coordinates to every block in the document.
#[must_use]
pub fn layout(document: &Document, algorithm: LayoutAlgorithm) -> LayoutOutcome {
    let graph = DocumentGraph::from_document(document);

    let attempted = match algorithm {
        LayoutAlgorithm::Hierarchical => hierarchical(&graph),
        LayoutAlgorithm::ForceDirected => force_directed(&graph),
        LayoutAlgorithm::Grid => Some(grid(&graph)),
    };

    match attempted {
        Some(positions) => LayoutOutcome {
            positions,
            algorithm_used: algorithm,
        },
        None => {
            tracing::debug!(algorithm = %algorithm, "layout fell back to grid");
            LayoutOutcome {
                positions: grid(&graph),
                algorithm_used: LayoutAlgorithm::Grid,
            }
        }
    }
}

/// Returns a new document with the outcome's positions applied.
#[must_use]
pub fn apply_layout(document: &Document, outcome: &LayoutOutcome) -> Document {
    let mut laid_out = document.clone();
    for block in &mut laid_out.blocks {
        if let Some(position) = outcome.positions.get(&block.id) {
            block.position = Some(*position);
        }
    }
    laid_out
}

/// Parses document text, lays it out, and reports the updated text.
///
/// # Errors
///
/// Returns an error when the text does not parse as a document.
pub fn auto_layout(text: &str, algorithm: LayoutAlgorithm) -> Result<LayoutReport, ParseError> {
    let started = Instant::now();
    let document = parse::parse_document(text)?;
    let outcome = layout(&document, algorithm);
    let laid_out = apply_layout(&document, &outcome);
    let text = parse::serialize(&laid_out)?;

    Ok(LayoutReport {
        text,
        total_blocks: document.blocks.len(),
        algorithm_used: outcome.algorithm_used,
        positions: outcome.positions,
        execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
    })
}

/// Levelled layout: level 0 for blocks with no predecessors, otherwise one
/// more than the deepest predecessor. Returns `None` on a cycle.
fn hierarchical(graph: &DocumentGraph) -> Option<HashMap<String, Position>> {
    let order = graph.topological_order()?;

    let mut levels = vec![0usize; graph.node_count()];
    for &node in &order {
        let preds = graph.predecessors(node);
        if !preds.is_empty() {
            levels[node] = 1 + preds.iter().map(|&p| levels[p]).max().unwrap_or(0);
        }
    }

    let mut slots_per_level: HashMap<usize, usize> = HashMap::new();
    let mut positions = HashMap::with_capacity(graph.node_count());
    for &node in &order {
        let level = levels[node];
        let slot = slots_per_level.entry(level).or_insert(0);
        positions.insert(
            graph.ids()[node].clone(),
            Position::new(*slot as f64 * HORIZONTAL_SPACING, level as f64 * VERTICAL_SPACING),
        );
        *slot += 1;
    }

    Some(positions)
}

/// Spring simulation: attraction along edges, repulsion between all node
/// pairs, a fixed iteration count, then scaling to pixel space. Seeded on
/// a circle so the result is deterministic. Returns `None` when the
/// simulation produces non-finite coordinates.
fn force_directed(graph: &DocumentGraph) -> Option<HashMap<String, Position>> {
    let n = graph.node_count();
    if n == 0 {
        return Some(HashMap::new());
    }

    let mut points: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    let k = 1.0 / (n as f64).sqrt();
    for iteration in 0..FORCE_ITERATIONS {
        let mut displacement = vec![(0.0f64, 0.0f64); n];

        // Repulsion between every pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(1e-9);
                let force = k * k / distance;
                let (ux, uy) = (dx / distance, dy / distance);
                displacement[i].0 += ux * force;
                displacement[i].1 += uy * force;
                displacement[j].0 -= ux * force;
                displacement[j].1 -= uy * force;
            }
        }

        // Attraction along edges.
        for &(from, to) in graph.edges() {
            let dx = points[from].0 - points[to].0;
            let dy = points[from].1 - points[to].1;
            let distance = (dx * dx + dy * dy).sqrt().max(1e-9);
            let force = distance * distance / k;
            let (ux, uy) = (dx / distance, dy / distance);
            displacement[from].0 -= ux * force;
            displacement[from].1 -= uy * force;
            displacement[to].0 += ux * force;
            displacement[to].1 += uy * force;
        }

        // Cooling limits movement each iteration.
        let temperature = 0.1 * (1.0 - iteration as f64 / FORCE_ITERATIONS as f64);
        for i in 0..n {
            let (dx, dy) = displacement[i];
            let magnitude = (dx * dx + dy * dy).sqrt().max(1e-9);
            let step = magnitude.min(temperature);
            points[i].0 += dx / magnitude * step;
            points[i].1 += dy / magnitude * step;
        }
    }

    let extent = points
        .iter()
        .flat_map(|&(x, y)| [x.abs(), y.abs()])
        .fold(0.0f64, f64::max)
        .max(1e-9);

    let mut positions = HashMap::with_capacity(n);
    for (i, &(x, y)) in points.iter().enumerate() {
        let position = Position::new(x / extent * FORCE_SCALE, y / extent * FORCE_SCALE);
        if !position.x.is_finite() || !position.y.is_finite() {
            return None;
        }
        positions.insert(graph.ids()[i].clone(), position);
    }
    Some(positions)
}

/// Square-ish grid in declaration order.
fn grid(graph: &DocumentGraph) -> HashMap<String, Position> {
    let n = graph.node_count();
    if n == 0 {
        return HashMap::new();
    }

    let cols = (n as f64).sqrt().ceil() as usize;
    graph
        .ids()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            (
                id.clone(),
                Position::new(
                    (i % cols) as f64 * HORIZONTAL_SPACING,
                    (i / cols) as f64 * VERTICAL_SPACING,
                ),
            )
        })
        .collect()
}
