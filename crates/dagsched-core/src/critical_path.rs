//! Critical path (global longest path) of a weighted DAG.
//!
//! # Algorithm
//!
//! 1. Topologically sort the graph.
//! 2. Every zero-in-degree vertex is a candidate start at distance 0; every
//!    other vertex starts unreached.
//! 3. Relax edges in topological order: `dist[v] = max(dist[v], dist[u] + w)`,
//!    recording `u` as the predecessor of `v` on strict improvement only, so
//!    the first edge (in order) achieving a maximum keeps it.
//! 4. The sink is the vertex with the largest final distance; scanning ids in
//!    ascending order with a strict `>` makes the lowest id win ties.
//! 5. Follow predecessors back from the sink to its start and reverse.
//!
//! The reported weight is clamped at 0: with negative edge weights the best
//! path may be a lone vertex.
//!
//! # Cyclic input
//!
//! Only the acyclic prefix returned by the sorter is relaxed. The result on a
//! cyclic graph is partial and unspecified beyond that; it is logged with
//! `warn!` and never raised as an error. Callers that need a meaningful
//! answer condense the graph first ([`crate::scc`]).

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::GraphError;
use crate::graph::{Adjacency, Graph};
use crate::metrics::{MetricsSink, NoopMetrics, counters};
use crate::topo;

/// A maximum-weight source-to-sink path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPath {
    /// Vertices from the start of the path to its sink.
    pub path: Vec<usize>,
    /// Sum of edge weights along `path`, never negative.
    pub total_weight: i64,
}

impl CriticalPath {
    /// The result for a graph with no vertices.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            path: Vec::new(),
            total_weight: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// First vertex of the path.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.path.first().copied()
    }

    /// Last vertex of the path.
    #[must_use]
    pub fn sink(&self) -> Option<usize> {
        self.path.last().copied()
    }
}

/// Find the critical path of `dag`.
///
/// # Errors
///
/// Returns [`GraphError::WeightOverflow`] if a path sum leaves the `i64`
/// range.
pub fn find_critical_path(dag: &Graph) -> Result<CriticalPath, GraphError> {
    find_critical_path_with_metrics(dag, &mut NoopMetrics)
}

/// [`find_critical_path`] with instrumentation.
///
/// # Errors
///
/// See [`find_critical_path`].
#[instrument(skip_all, fields(vertices = dag.vertex_count(), edges = dag.edge_count()))]
pub fn find_critical_path_with_metrics(
    dag: &Graph,
    metrics: &mut dyn MetricsSink,
) -> Result<CriticalPath, GraphError> {
    let n = dag.vertex_count();
    if n == 0 {
        return Ok(CriticalPath::empty());
    }

    metrics.start_timer();

    let adjacency = Adjacency::build(dag);
    let order = topo::kahn(dag, &adjacency, metrics);
    if order.has_cycle {
        warn!(
            ordered = order.order.len(),
            vertices = n,
            "critical path requested on a cyclic graph; result covers the acyclic prefix only"
        );
    }

    let mut dist: Vec<Option<i64>> = dag
        .in_degrees()
        .into_iter()
        .map(|d| (d == 0).then_some(0))
        .collect();
    let mut pred: Vec<Option<usize>> = vec![None; n];

    for &u in &order.order {
        let Some(du) = dist[u] else {
            continue;
        };
        for (v, w) in adjacency.out_edges(u) {
            let candidate = du
                .checked_add(w)
                .ok_or(GraphError::WeightOverflow { from: u, to: v })?;
            if dist[v].is_none_or(|dv| candidate > dv) {
                dist[v] = Some(candidate);
                pred[v] = Some(u);
                metrics.increment(counters::EDGE_RELAXATIONS);
            }
        }
    }

    let best = dist
        .iter()
        .enumerate()
        .filter_map(|(v, d)| d.map(|d| (v, d)))
        .fold(None, |best: Option<(usize, i64)>, (v, d)| {
            if best.is_none_or(|(_, bd)| d > bd) {
                Some((v, d))
            } else {
                best
            }
        });

    let Some((sink, weight)) = best else {
        // Nothing reached: every vertex sits on or behind a cycle.
        return Ok(CriticalPath::empty());
    };

    let mut path = vec![sink];
    let mut current = sink;
    while let Some(prev) = pred[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();

    let total_weight = weight.max(0);
    debug!(length = path.len(), total_weight, "critical path found");

    Ok(CriticalPath { path, total_weight })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
