//! Vertex/edge store shared by every analysis.
//!
//! # Overview
//!
//! A [`Graph`] has a fixed vertex count `n` (vertices are the integers
//! `0..n`) and an insertion-ordered edge list. Edges are only ever appended
//! through [`Graph::add_edge`], which validates both endpoints first, so the
//! invariant "every endpoint lies in `[0, n)`" holds for the lifetime of the
//! value.
//!
//! Self-loops and parallel edges are kept exactly as inserted. Insertion
//! order matters: the topological sorter and the SCC engine scan outgoing
//! edges in that order, which is what makes their output reproducible.
//!
//! ## Undirected graphs
//!
//! An undirected graph stores each inserted edge twice (`u → v` then
//! `v → u`, same weight). Algorithms never special-case directedness.
//!
//! ## Adjacency
//!
//! Algorithms do not walk [`Graph::edges`] per vertex. They build an
//! [`Adjacency`] once per call: a CSR layout (offsets + flat target/weight
//! arrays) that keeps each vertex's outgoing edges in insertion order.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::error::GraphError;

/// Weight-model tag used when a caller does not supply one.
pub const DEFAULT_WEIGHT_MODEL: &str = "integer";

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A weighted directed edge `source → target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    source: usize,
    target: usize,
    weight: i64,
}

impl Edge {
    #[must_use]
    pub const fn new(source: usize, target: usize, weight: i64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    #[must_use]
    pub const fn weight(&self) -> i64 {
        self.weight
    }

    /// `true` when the edge starts and ends at the same vertex.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.source, self.target, self.weight)
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed (or undirected) weighted graph over vertices `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<Edge>,
    directed: bool,
    weight_model: String,
}

impl Graph {
    /// Create an empty graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn new(vertex_count: usize, directed: bool, weight_model: impl Into<String>) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
            directed,
            weight_model: weight_model.into(),
        }
    }

    /// Shorthand for a directed graph with the default weight model.
    #[must_use]
    pub fn directed(vertex_count: usize) -> Self {
        Self::new(vertex_count, true, DEFAULT_WEIGHT_MODEL)
    }

    /// Build a directed graph from `(u, v, w)` triples.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for the first triple with an
    /// endpoint outside `[0, vertex_count)`.
    pub fn from_edges(
        vertex_count: usize,
        edges: impl IntoIterator<Item = (usize, usize, i64)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::directed(vertex_count);
        for (u, v, w) in edges {
            graph.add_edge(u, v, w)?;
        }
        Ok(graph)
    }

    /// Append the edge `u → v` with weight `w` (and `v → u` when undirected).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if either endpoint is outside
    /// `[0, vertex_count)`. Nothing is appended in that case.
    pub fn add_edge(&mut self, u: usize, v: usize, w: i64) -> Result<(), GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        self.edges.push(Edge::new(u, v, w));
        if !self.directed {
            self.edges.push(Edge::new(v, u, w));
        }
        Ok(())
    }

    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub fn weight_model(&self) -> &str {
        &self.weight_model
    }

    /// `true` when the graph has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `u`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if `u` is not a vertex.
    pub fn edges_from(&self, u: usize) -> Result<impl Iterator<Item = &Edge>, GraphError> {
        self.check_vertex(u)?;
        Ok(self.edges.iter().filter(move |e| e.source == u))
    }

    /// Edges entering `v`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if `v` is not a vertex.
    pub fn edges_to(&self, v: usize) -> Result<impl Iterator<Item = &Edge>, GraphError> {
        self.check_vertex(v)?;
        Ok(self.edges.iter().filter(move |e| e.target == v))
    }

    /// In-degree of every vertex, from one scan of the edge list.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut in_degree = vec![0usize; self.vertex_count];
        for edge in &self.edges {
            in_degree[edge.target] += 1;
        }
        in_degree
    }

    /// BLAKE3 digest of the vertex count, directedness and ordered edge list.
    ///
    /// Two graphs with the same hash produce identical analysis results. The
    /// weight-model tag is informational and excluded.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.vertex_count as u64).to_le_bytes());
        hasher.update(&[u8::from(self.directed)]);
        for edge in &self.edges {
            hasher.update(&(edge.source as u64).to_le_bytes());
            hasher.update(&(edge.target as u64).to_le_bytes());
            hasher.update(&edge.weight.to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }

    pub(crate) fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertex_count,
            })
        }
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Graph{{n={}, edges={}, directed={}, weightModel='{}'}}",
            self.vertex_count,
            self.edges.len(),
            self.directed,
            self.weight_model
        )
    }
}

// ---------------------------------------------------------------------------
// Adjacency (CSR)
// ---------------------------------------------------------------------------

/// Compressed outgoing adjacency built from a [`Graph`].
///
/// Outgoing edges of vertex `v` occupy slots `offsets[v]..offsets[v + 1]` of
/// the flat `targets` / `weights` arrays, in edge insertion order.
#[derive(Debug, Clone)]
pub(crate) struct Adjacency {
    offsets: Vec<usize>,
    targets: Vec<usize>,
    weights: Vec<i64>,
}

impl Adjacency {
    pub(crate) fn build(graph: &Graph) -> Self {
        let n = graph.vertex_count();
        let edges = graph.edges();

        let mut offsets = vec![0usize; n + 1];
        for edge in edges {
            offsets[edge.source + 1] += 1;
        }
        for v in 0..n {
            offsets[v + 1] += offsets[v];
        }

        // Stable counting sort by source keeps insertion order per vertex.
        let mut cursor = offsets.clone();
        let mut targets = vec![0usize; edges.len()];
        let mut weights = vec![0i64; edges.len()];
        for edge in edges {
            let slot = cursor[edge.source];
            targets[slot] = edge.target;
            weights[slot] = edge.weight;
            cursor[edge.source] += 1;
        }

        Self {
            offsets,
            targets,
            weights,
        }
    }

    /// Slot range holding the outgoing edges of `v`.
    pub(crate) fn slots(&self, v: usize) -> Range<usize> {
        self.offsets[v]..self.offsets[v + 1]
    }

    pub(crate) fn target(&self, slot: usize) -> usize {
        self.targets[slot]
    }

    /// `(target, weight)` pairs leaving `v`, in insertion order.
    pub(crate) fn out_edges(&self, v: usize) -> impl Iterator<Item = (usize, i64)> + '_ {
        let slots = self.slots(v);
        self.targets[slots.clone()]
            .iter()
            .copied()
            .zip(self.weights[slots].iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_rejects_out_of_range_endpoints() {
        let mut g = Graph::directed(3);
        assert_eq!(
            g.add_edge(0, 3, 1),
            Err(GraphError::VertexOutOfRange {
                vertex: 3,
                vertex_count: 3
            })
        );
        assert_eq!(
            g.add_edge(5, 0, 1),
            Err(GraphError::VertexOutOfRange {
                vertex: 5,
                vertex_count: 3
            })
        );
        assert_eq!(g.edge_count(), 0, "failed add must not append anything");
    }

    #[test]
    fn empty_graph_rejects_every_edge() {
        let mut g = Graph::directed(0);
        assert!(g.add_edge(0, 0, 1).is_err());
        assert!(g.is_empty());
    }

    #[test]
    fn undirected_graph_stores_both_directions() {
        let mut g = Graph::new(2, false, "integer");
        g.add_edge(0, 1, 4).expect("valid edge");
        assert_eq!(g.edges(), &[Edge::new(0, 1, 4), Edge::new(1, 0, 4)]);
    }

    #[test]
    fn self_loops_and_parallel_edges_are_kept() {
        let g = Graph::from_edges(2, [(0, 0, 1), (0, 1, 2), (0, 1, 2)]).expect("valid");
        assert_eq!(g.edge_count(), 3);
        assert!(g.edges()[0].is_self_loop());
    }

    #[test]
    fn edges_from_and_to_preserve_insertion_order() {
        let g = Graph::from_edges(4, [(0, 2, 1), (1, 2, 5), (0, 3, 2), (0, 1, 7)]).expect("valid");

        let from_zero: Vec<_> = g.edges_from(0).expect("in range").copied().collect();
        assert_eq!(
            from_zero,
            vec![Edge::new(0, 2, 1), Edge::new(0, 3, 2), Edge::new(0, 1, 7)]
        );

        let into_two: Vec<_> = g.edges_to(2).expect("in range").map(Edge::source).collect();
        assert_eq!(into_two, vec![0, 1]);

        assert!(g.edges_from(4).is_err());
        assert!(g.edges_to(9).is_err());
    }

    #[test]
    fn in_degrees_count_parallel_edges() {
        let g = Graph::from_edges(3, [(0, 2, 1), (1, 2, 1), (1, 2, 1)]).expect("valid");
        assert_eq!(g.in_degrees(), vec![0, 0, 3]);
    }

    #[test]
    fn display_matches_summary_format() {
        let g = Graph::from_edges(3, [(0, 1, 1)]).expect("valid");
        assert_eq!(
            g.to_string(),
            "Graph{n=3, edges=1, directed=true, weightModel='integer'}"
        );
        assert_eq!(Edge::new(1, 2, -3).to_string(), "1 -> 2 (-3)");
    }

    #[test]
    fn content_hash_tracks_edges_not_weight_model() {
        let a = Graph::from_edges(3, [(0, 1, 1)]).expect("valid");
        let mut b = Graph::new(3, true, "unit");
        b.add_edge(0, 1, 1).expect("valid");
        assert_eq!(a.content_hash(), b.content_hash());

        let c = Graph::from_edges(3, [(0, 1, 2)]).expect("valid");
        assert_ne!(a.content_hash(), c.content_hash());
        assert!(a.content_hash().starts_with("blake3:"));
    }

    #[test]
    fn adjacency_groups_by_source_in_insertion_order() {
        let g = Graph::from_edges(3, [(2, 0, 9), (0, 2, 1), (2, 1, 8), (0, 1, 3)]).expect("valid");
        let adj = Adjacency::build(&g);

        assert_eq!(adj.out_edges(0).collect::<Vec<_>>(), vec![(2, 1), (1, 3)]);
        assert_eq!(adj.out_edges(1).count(), 0);
        assert_eq!(adj.out_edges(2).collect::<Vec<_>>(), vec![(0, 9), (1, 8)]);

        let slots = adj.slots(2);
        assert_eq!(adj.target(slots.start), 0);
    }
}
