//! Kahn's topological sort with cycle detection.
//!
//! # Determinism
//!
//! The FIFO queue is seeded with every zero-in-degree vertex in ascending id
//! order, and outgoing edges are scanned in insertion order. The same graph
//! therefore always yields the same order.
//!
//! # Cycles
//!
//! A cycle is not an error. When the order comes up short of `n` vertices,
//! [`TopoResult::has_cycle`] is set and the order holds only the acyclic
//! prefix: the vertices whose every predecessor could be emitted. Vertices on
//! a cycle, and everything downstream of one, are missing. Callers that
//! schedule from the order must check the flag first.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::{Adjacency, Graph};
use crate::metrics::{MetricsSink, NoopMetrics, counters};

/// Output of [`sort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopoResult {
    /// Vertices in topological order (a strict prefix when `has_cycle`).
    pub order: Vec<usize>,
    /// `true` when at least one cycle kept vertices out of `order`.
    pub has_cycle: bool,
}

impl TopoResult {
    /// `true` when the order covers all `vertex_count` vertices.
    #[must_use]
    pub fn is_complete(&self, vertex_count: usize) -> bool {
        self.order.len() == vertex_count
    }

    /// Position of each vertex in the order, `None` for vertices left out.
    #[must_use]
    pub fn positions(&self, vertex_count: usize) -> Vec<Option<usize>> {
        let mut positions = vec![None; vertex_count];
        for (pos, &v) in self.order.iter().enumerate() {
            positions[v] = Some(pos);
        }
        positions
    }
}

/// Topologically sort `graph`.
#[must_use]
pub fn sort(graph: &Graph) -> TopoResult {
    sort_with_metrics(graph, &mut NoopMetrics)
}

/// [`sort`], reporting one `topo_pops` increment per emitted vertex and a
/// `cycle_detected` bump when the order is partial.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn sort_with_metrics(graph: &Graph, metrics: &mut dyn MetricsSink) -> TopoResult {
    let adjacency = Adjacency::build(graph);
    kahn(graph, &adjacency, metrics)
}

/// Kahn's algorithm over a prebuilt adjacency.
pub(crate) fn kahn(graph: &Graph, adjacency: &Adjacency, metrics: &mut dyn MetricsSink) -> TopoResult {
    let n = graph.vertex_count();
    if n == 0 {
        return TopoResult {
            order: Vec::new(),
            has_cycle: false,
        };
    }

    let mut in_degree = graph.in_degrees();
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut order = Vec::with_capacity(n);

    metrics.start_timer();

    while let Some(u) = queue.pop_front() {
        order.push(u);
        metrics.increment(counters::TOPO_POPS);

        for (v, _) in adjacency.out_edges(u) {
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    let has_cycle = order.len() != n;
    if has_cycle {
        metrics.add(counters::CYCLE_DETECTED, 1);
        debug!(
            emitted = order.len(),
            missing = n - order.len(),
            "topological sort stopped at a cycle"
        );
    } else {
        debug!(emitted = order.len(), "topological sort complete");
    }

    TopoResult { order, has_cycle }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
