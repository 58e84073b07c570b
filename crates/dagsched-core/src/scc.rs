//! Strongly connected components and condensation.
//!
//! # Overview
//!
//! [`find_sccs`] runs Tarjan's algorithm without recursion. Each open DFS
//! call is a [`Frame`] on a heap-allocated stack holding the vertex and the
//! remaining slice of its outgoing-edge slots, so a dependency chain of any
//! length is handled without touching the thread's call stack.
//!
//! Per-vertex state lives in plain arrays indexed by vertex id:
//!
//! | Array      | Meaning |
//! |------------|---------|
//! | `index`    | Discovery order, [`UNVISITED`] until discovered. |
//! | `low`      | Smallest discovery index reachable via the search subtree plus back/cross edges into the open search. |
//! | `on_stack` | Vertex is on the component stack (its SCC is not closed yet). |
//!
//! A component closes when a vertex finishes with `low == index`; it and
//! everything above it on the component stack form one SCC. Components are
//! numbered in closing order. Use [`crate::topo::sort`] on the condensation
//! for a schedule.
//!
//! # Condensation
//!
//! [`build_condensation_graph`] contracts every component to a vertex. Each
//! ordered pair of distinct components linked by at least one original edge
//! yields exactly one condensation edge of weight 1. The condensation carries
//! ordering only; original weights are dropped.

use std::collections::HashSet;
use std::ops::Range;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{Adjacency, Graph};
use crate::metrics::{MetricsSink, NoopMetrics, counters};

/// Discovery-index sentinel for vertices the search has not reached.
const UNVISITED: usize = usize::MAX;

/// Weight-model tag of every condensation graph.
pub const CONDENSATION_WEIGHT_MODEL: &str = "unit";

// ---------------------------------------------------------------------------
// SccResult
// ---------------------------------------------------------------------------

/// Partition of a graph's vertices into strongly connected components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccResult {
    /// Components in closing order; members sorted ascending.
    components: Vec<Vec<usize>>,
    /// `component_of[v]` is the id of the component holding `v`.
    component_of: Vec<usize>,
}

impl SccResult {
    /// Components in id order.
    #[must_use]
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// Component id of every vertex, indexed by vertex id.
    #[must_use]
    pub fn component_map(&self) -> &[usize] {
        &self.component_of
    }

    /// Component id of `vertex`, or `None` if it is not a vertex.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> Option<usize> {
        self.component_of.get(vertex).copied()
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components with more than one member (dependency cycles), with ids.
    pub fn nontrivial_components(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, members)| members.len() > 1)
            .map(|(id, members)| (id, members.as_slice()))
    }

    /// Contract each component of `graph` to a single vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidPartition`] if `graph` is not the graph
    /// this result was computed from (vertex counts differ).
    pub fn condensation(&self, graph: &Graph) -> Result<Graph, GraphError> {
        self.condensation_with_metrics(graph, &mut NoopMetrics)
    }

    /// [`SccResult::condensation`] with instrumentation.
    ///
    /// # Errors
    ///
    /// See [`SccResult::condensation`].
    pub fn condensation_with_metrics(
        &self,
        graph: &Graph,
        metrics: &mut dyn MetricsSink,
    ) -> Result<Graph, GraphError> {
        if graph.vertex_count() != self.component_of.len() {
            return Err(GraphError::InvalidPartition {
                reason: format!(
                    "result covers {} vertices but graph has {}",
                    self.component_of.len(),
                    graph.vertex_count()
                ),
            });
        }
        condense(graph, &self.component_of, self.components.len(), metrics)
    }

    /// Consume the result, keeping only the component lists.
    #[must_use]
    pub fn into_components(self) -> Vec<Vec<usize>> {
        self.components
    }
}

// ---------------------------------------------------------------------------
// Tarjan
// ---------------------------------------------------------------------------

/// Decompose `graph` into strongly connected components.
#[must_use]
pub fn find_sccs(graph: &Graph) -> SccResult {
    find_sccs_with_metrics(graph, &mut NoopMetrics)
}

/// [`find_sccs`], reporting one `dfs_visits` increment per discovered vertex.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn find_sccs_with_metrics(graph: &Graph, metrics: &mut dyn MetricsSink) -> SccResult {
    let n = graph.vertex_count();
    let adjacency = Adjacency::build(graph);
    let mut tarjan = Tarjan::new(n);

    metrics.start_timer();
    for root in 0..n {
        if tarjan.index[root] == UNVISITED {
            tarjan.strong_connect(root, &adjacency, metrics);
        }
    }

    let mut components = tarjan.components;
    let mut component_of = vec![0usize; n];
    for (id, members) in components.iter_mut().enumerate() {
        members.sort_unstable();
        for &v in members.iter() {
            component_of[v] = id;
        }
    }

    debug!(
        components = components.len(),
        nontrivial = components.iter().filter(|c| c.len() > 1).count(),
        "scc decomposition complete"
    );

    SccResult {
        components,
        component_of,
    }
}

/// One suspended `strongconnect(vertex)` call.
struct Frame {
    vertex: usize,
    /// Outgoing-edge slots not yet scanned.
    pending: Range<usize>,
}

/// Working state of one decomposition, dropped when it returns.
struct Tarjan {
    index: Vec<usize>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    /// Vertices of the components still open, in discovery order.
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            index: vec![UNVISITED; n],
            low: vec![UNVISITED; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn discover(&mut self, v: usize, metrics: &mut dyn MetricsSink) {
        self.index[v] = self.next_index;
        self.low[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        metrics.increment(counters::DFS_VISITS);
    }

    fn strong_connect(&mut self, root: usize, adjacency: &Adjacency, metrics: &mut dyn MetricsSink) {
        self.discover(root, metrics);
        let mut frames = vec![Frame {
            vertex: root,
            pending: adjacency.slots(root),
        }];

        while let Some(frame) = frames.last_mut() {
            let v = frame.vertex;

            if let Some(slot) = frame.pending.next() {
                let w = adjacency.target(slot);
                if self.index[w] == UNVISITED {
                    // Tree edge: descend; `low[v]` is folded when `w` finishes.
                    self.discover(w, metrics);
                    frames.push(Frame {
                        vertex: w,
                        pending: adjacency.slots(w),
                    });
                } else if self.on_stack[w] {
                    self.low[v] = self.low[v].min(self.index[w]);
                }
                continue;
            }

            // Every edge of `v` scanned: the call for `v` returns.
            frames.pop();
            if self.low[v] == self.index[v] {
                self.close_component(v);
            }
            if let Some(parent) = frames.last() {
                let p = parent.vertex;
                self.low[p] = self.low[p].min(self.low[v]);
            }
        }
    }

    /// Pop the component rooted at `root` off the component stack.
    fn close_component(&mut self, root: usize) {
        let mut members = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            members.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(members);
    }
}

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

/// Build the condensation of `original` for an explicit component list.
///
/// Component `i` of `components` becomes vertex `i` of the result.
///
/// # Errors
///
/// Returns [`GraphError::InvalidPartition`] if `components` names a vertex
/// outside the graph, names a vertex twice, or leaves a vertex out.
pub fn build_condensation_graph(
    original: &Graph,
    components: &[Vec<usize>],
) -> Result<Graph, GraphError> {
    build_condensation_graph_with_metrics(original, components, &mut NoopMetrics)
}

/// [`build_condensation_graph`], reporting one `cond_edges` increment per
/// emitted edge.
///
/// # Errors
///
/// See [`build_condensation_graph`].
pub fn build_condensation_graph_with_metrics(
    original: &Graph,
    components: &[Vec<usize>],
    metrics: &mut dyn MetricsSink,
) -> Result<Graph, GraphError> {
    let n = original.vertex_count();
    let mut component_of = vec![UNVISITED; n];

    for (id, members) in components.iter().enumerate() {
        for &v in members {
            if v >= n {
                return Err(GraphError::InvalidPartition {
                    reason: format!("component {id} names vertex {v}, graph has {n} vertices"),
                });
            }
            if component_of[v] != UNVISITED {
                return Err(GraphError::InvalidPartition {
                    reason: format!(
                        "vertex {v} appears in components {} and {id}",
                        component_of[v]
                    ),
                });
            }
            component_of[v] = id;
        }
    }

    if let Some(missing) = component_of.iter().position(|&c| c == UNVISITED) {
        return Err(GraphError::InvalidPartition {
            reason: format!("vertex {missing} is not in any component"),
        });
    }

    condense(original, &component_of, components.len(), metrics)
}

#[instrument(skip_all, fields(vertices = original.vertex_count(), components = component_count))]
fn condense(
    original: &Graph,
    component_of: &[usize],
    component_count: usize,
    metrics: &mut dyn MetricsSink,
) -> Result<Graph, GraphError> {
    let mut condensed = Graph::new(component_count, true, CONDENSATION_WEIGHT_MODEL);
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for edge in original.edges() {
        let from = component_of[edge.source()];
        let to = component_of[edge.target()];
        if from != to && seen.insert((from, to)) {
            condensed.add_edge(from, to, 1)?;
            metrics.increment(counters::COND_EDGES);
        }
    }

    debug!(edges = condensed.edge_count(), "condensation built");
    Ok(condensed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
