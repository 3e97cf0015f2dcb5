//! Directed graph over block ids.
//!
//! A small self-contained adjacency structure used by the layout engine;
//! nodes keep document declaration order, and lookups are by id.
//! Connections whose endpoints name no declared block are skipped so that
//! graph nodes always correspond one-to-one with the document's blocks.

use crate::model::Document;
use std::collections::{HashMap, VecDeque};

/// Directed graph of block ids.
#[derive(Debug, Clone)]
pub struct DocumentGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<(usize, usize)>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl DocumentGraph {
    /// Builds the graph from a document's blocks and connections.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let mut ids = Vec::new();
        let mut index = HashMap::new();
        for block in &document.blocks {
            if !index.contains_key(&block.id) {
                index.insert(block.id.clone(), ids.len());
                ids.push(block.id.clone());
            }
        }

        let mut edges = Vec::new();
        let mut successors = vec![Vec::new(); ids.len()];
        let mut predecessors = vec![Vec::new(); ids.len()];
        for connection in &document.connections {
            let (Some(&from), Some(&to)) =
                (index.get(&connection.from), index.get(&connection.to))
            else {
                continue;
            };
            edges.push((from, to));
            successors[from].push(to);
            predecessors[to].push(from);
        }

        Self {
            ids,
            index,
            edges,
            successors,
            predecessors,
        }
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Block ids in declaration order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Returns the node index for a block id.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Directed edges as `(from, to)` index pairs.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Predecessor indices of a node.
    #[must_use]
    pub fn predecessors(&self, node: usize) -> &[usize] {
        &self.predecessors[node]
    }

    /// Successor indices of a node.
    #[must_use]
    pub fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    /// Returns a topological ordering of node indices, or `None` when the
    /// graph contains a cycle.
    ///
    /// Kahn's algorithm with a FIFO queue seeded in declaration order, so
    /// the ordering is deterministic.
    #[must_use]
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let mut in_degree: Vec<usize> = self
            .predecessors
            .iter()
            .map(|preds| preds.len())
            .collect();

        let mut queue: VecDeque<usize> = (0..self.ids.len())
            .filter(|&node| in_degree[node] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.ids.len());
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &next in &self.successors[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        (order.len() == self.ids.len()).then_some(order)
    }
}
