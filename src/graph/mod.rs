pub mod errors;

pub use errors::GraphError;

use std::collections::HashMap;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Undirected;
use tracing::debug;

/// An edge as handed to the renderer: endpoints by node order plus its label text.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub from: usize,
    pub to: usize,
    pub label: Option<String>,
}

/// Directed graph of named nodes with optional edge labels.
///
/// Adding an existing `(from, to)` pair is a no-op, so the edge list of a
/// transition table collapses to one drawn edge per pair. Each edge holds at
/// most one label; labelling a pair again replaces the earlier label.
#[derive(Debug, Default, Clone)]
pub struct LabeledGraph {
    inner: DiGraph<String, Option<String>>,
    index: HashMap<String, NodeIndex>,
}

impl LabeledGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an edge list and an optional label mapping.
    pub fn from_edges<N: AsRef<str>>(
        edges: &[(N, N)],
        labels: Option<&[((N, N), &str)]>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from.as_ref(), to.as_ref());
        }

        if let Some(labels) = labels {
            for ((from, to), label) in labels {
                graph.add_label(from.as_ref(), to.as_ref(), label)?;
            }
        }

        debug!(nodes = graph.node_count(), edges = graph.edge_count(), "built graph");
        Ok(graph)
    }

    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.inner.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        let a = self.add_node(from);
        let b = self.add_node(to);
        if self.inner.find_edge(a, b).is_none() {
            self.inner.add_edge(a, b, None);
        }
    }

    pub fn add_label(&mut self, from: &str, to: &str, label: &str) -> Result<(), GraphError> {
        let edge = self
            .index
            .get(from)
            .zip(self.index.get(to))
            .and_then(|(&a, &b)| self.inner.find_edge(a, b))
            .ok_or_else(|| GraphError::UnknownEdge {
                from: from.to_string(),
                to: to.to_string(),
            })?;

        self.inner[edge] = Some(label.to_string());
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Node names in insertion order. Positions returned by a layout use the same order.
    pub fn node_names(&self) -> Vec<&str> {
        self.inner.node_indices().map(|idx| self.inner[idx].as_str()).collect()
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.inner.contains_edge(a, b),
            _ => false,
        }
    }

    pub fn edges(&self) -> Vec<EdgeView> {
        self.inner
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.inner.edge_endpoints(e)?;
                let label = self.inner[e].clone();
                Some(EdgeView { from: a.index(), to: b.index(), label })
            })
            .collect()
    }

    pub fn label(&self, from: &str, to: &str) -> Option<&str> {
        let a = *self.index.get(from)?;
        let b = *self.index.get(to)?;
        self.inner[self.inner.find_edge(a, b)?].as_deref()
    }

    /// All-pairs hop counts ignoring edge direction. `None` marks unreachable pairs.
    pub fn hop_distances(&self) -> Vec<Vec<Option<usize>>> {
        let undirected = self
            .inner
            .map(|_, _| (), |_, _| ())
            .into_edge_type::<Undirected>();

        let n = undirected.node_count();
        undirected
            .node_indices()
            .map(|start| {
                let reached = dijkstra(&undirected, start, None, |_| 1usize);
                (0..n).map(|j| reached.get(&NodeIndex::new(j)).copied()).collect()
            })
            .collect()
    }
}

// -- Unit tests --
