//! JSON graph documents.
//!
//! ```json
//! { "directed": true, "n": 8, "weight_model": "integer", "source": 0,
//!   "edges": [ { "u": 0, "v": 1, "w": 2 } ] }
//! ```
//!
//! Every key is optional. A missing `n` is inferred as one past the largest
//! edge endpoint (0 with no edges). `weightModel` is accepted as an alias of
//! `weight_model`. Edges go through [`Graph::add_edge`] in document order, so
//! a document with an endpoint outside `[0, n)` is rejected. Documents
//! describing more than [`MAX_VERTICES`] vertices are rejected before any
//! per-vertex state is allocated.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::{DEFAULT_WEIGHT_MODEL, Graph};

/// Largest vertex count a document may declare or imply.
pub const MAX_VERTICES: usize = 1 << 24;

/// One `{ "u": .., "v": .., "w": .. }` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: usize,
    pub v: usize,
    pub w: i64,
}

/// Serialized form of a graph plus its designated source vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default = "default_true")]
    pub directed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<usize>,
    #[serde(default = "default_weight_model", alias = "weightModel")]
    pub weight_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// A loaded graph together with the source vertex its document named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInput {
    pub graph: Graph,
    /// `None` only for a graph with no vertices.
    pub source: Option<usize>,
}

impl GraphDocument {
    /// Describe `graph` as a document with an explicit vertex count.
    ///
    /// Undirected graphs store each edge in both directions; only the first
    /// copy of each pair is written so reloading yields the same edge list.
    #[must_use]
    pub fn from_graph(graph: &Graph, source: Option<usize>) -> Self {
        let step = if graph.is_directed() { 1 } else { 2 };
        let edges = graph
            .edges()
            .iter()
            .step_by(step)
            .map(|e| EdgeRecord {
                u: e.source(),
                v: e.target(),
                w: e.weight(),
            })
            .collect();

        Self {
            directed: graph.is_directed(),
            n: Some(graph.vertex_count()),
            weight_model: graph.weight_model().to_string(),
            source,
            edges,
        }
    }

    /// Vertex count: the explicit `n`, or one past the largest endpoint.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.n.unwrap_or_else(|| {
            self.edges
                .iter()
                .map(|e| e.u.max(e.v).saturating_add(1))
                .max()
                .unwrap_or(0)
        })
    }

    /// Build the graph this document describes.
    ///
    /// # Errors
    ///
    /// Fails when `n` exceeds [`MAX_VERTICES`], when `source` is outside
    /// `[0, n)` on a non-empty graph, or when an edge names a vertex outside
    /// `[0, n)`.
    pub fn into_input(self) -> Result<GraphInput> {
        let n = self.vertex_count();
        if n > MAX_VERTICES {
            bail!("graph with {n} vertices exceeds the limit of {MAX_VERTICES}");
        }

        let source = if n == 0 {
            None
        } else {
            let source = self.source.unwrap_or(0);
            if source >= n {
                bail!("source vertex {source} out of bounds for graph with {n} vertices");
            }
            Some(source)
        };

        let mut graph = Graph::new(n, self.directed, self.weight_model);
        for (index, edge) in self.edges.iter().enumerate() {
            graph
                .add_edge(edge.u, edge.v, edge.w)
                .with_context(|| format!("invalid edge #{index} ({} -> {})", edge.u, edge.v))?;
        }

        Ok(GraphInput { graph, source })
    }

    /// Pretty-printed JSON, as written by dataset generation.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize graph document")
    }
}

/// Parse a graph document from a JSON string.
///
/// # Errors
///
/// Fails on malformed JSON or any check of [`GraphDocument::into_input`].
pub fn parse_graph(json: &str) -> Result<GraphInput> {
    let document: GraphDocument =
        serde_json::from_str(json).context("failed to parse graph document")?;
    document.into_input()
}

/// Read and parse a graph document from `path`.
///
/// # Errors
///
/// Fails when the file cannot be read, or for any [`parse_graph`] error.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_graph(path: &Path) -> Result<GraphInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let input = parse_graph(&content).with_context(|| format!("failed to load {}", path.display()))?;
    debug!(
        vertices = input.graph.vertex_count(),
        edges = input.graph.edge_count(),
        "graph loaded"
    );
    Ok(input)
}

const fn default_true() -> bool {
    true
}

fn default_weight_model() -> String {
    DEFAULT_WEIGHT_MODEL.to_string()
}
