//! Single-source shortest and longest distances over a DAG.
//!
//! Both directions share one dynamic program: topologically sort the graph,
//! set the source to 0 and every other vertex to [`Distance::Unreachable`],
//! then relax each edge once in topological order. Relaxation never starts
//! from an unreachable vertex, so the marker can only be replaced by a real
//! path sum, never by arithmetic on a sentinel.
//!
//! # Cyclic input
//!
//! The DP is only defined on acyclic graphs. On a cyclic graph the sorter
//! returns a partial order and vertices outside it never propagate their
//! distance; the result is whatever the acyclic prefix produces. This is a
//! caller contract violation, reported with a `warn!`, not an error.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{instrument, warn};

use crate::error::GraphError;
use crate::graph::{Adjacency, Graph};
use crate::metrics::{MetricsSink, NoopMetrics, counters};
use crate::topo;

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Distance from the source to one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distance {
    /// A path exists; the value is its optimal weight.
    Finite(i64),
    /// No path from the source reaches this vertex.
    Unreachable,
}

impl Distance {
    #[must_use]
    pub const fn is_reachable(self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// The finite value, if any.
    #[must_use]
    pub const fn finite(self) -> Option<i64> {
        match self {
            Self::Finite(d) => Some(d),
            Self::Unreachable => None,
        }
    }
}

impl From<Option<i64>> for Distance {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Unreachable, Self::Finite)
    }
}

/// Finite distances serialize as integers, unreachable ones as `null`.
impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(d) => serializer.serialize_i64(*d),
            Self::Unreachable => serializer.serialize_none(),
        }
    }
}

/// Which optimum a [`Distances`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    Shortest,
    Longest,
}

impl PathKind {
    /// `true` when `candidate` should replace `current`.
    const fn improves(self, candidate: i64, current: i64) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }

    /// How the unreachable marker is written in text output: the infinity a
    /// numeric implementation would have used.
    #[must_use]
    pub const fn unreachable_label(self) -> &'static str {
        match self {
            Self::Shortest => "INF",
            Self::Longest => "-INF",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shortest => "shortest",
            Self::Longest => "longest",
        })
    }
}

// ---------------------------------------------------------------------------
// Distances
// ---------------------------------------------------------------------------

/// Per-vertex distances from one source, indexed by vertex id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distances {
    kind: PathKind,
    source: Option<usize>,
    values: Vec<Distance>,
}

impl Distances {
    #[must_use]
    pub const fn kind(&self) -> PathKind {
        self.kind
    }

    /// The source vertex; `None` only for the empty graph.
    #[must_use]
    pub const fn source(&self) -> Option<usize> {
        self.source
    }

    /// Distance to `vertex`, or `None` if it is not a vertex.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<Distance> {
        self.values.get(vertex).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Distance] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of vertices with a finite distance (the source included).
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.values.iter().filter(|d| d.is_reachable()).count()
    }

    /// Text form of the distance to `vertex`: the number, or `INF` / `-INF`.
    #[must_use]
    pub fn label(&self, vertex: usize) -> Option<String> {
        self.get(vertex).map(|d| match d {
            Distance::Finite(value) => value.to_string(),
            Distance::Unreachable => self.kind.unreachable_label().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Minimum path weight from `source` to every vertex of `dag`.
///
/// Defined only for acyclic graphs; see the module docs for cyclic input.
/// On the empty graph every source yields an empty result.
///
/// # Errors
///
/// - [`GraphError::SourceOutOfRange`] if `source` is not a vertex.
/// - [`GraphError::WeightOverflow`] if a path sum leaves the `i64` range.
pub fn shortest_paths(dag: &Graph, source: usize) -> Result<Distances, GraphError> {
    single_source(dag, source, PathKind::Shortest, &mut NoopMetrics)
}

/// [`shortest_paths`] with instrumentation.
///
/// # Errors
///
/// See [`shortest_paths`].
pub fn shortest_paths_with_metrics(
    dag: &Graph,
    source: usize,
    metrics: &mut dyn MetricsSink,
) -> Result<Distances, GraphError> {
    single_source(dag, source, PathKind::Shortest, metrics)
}

/// Maximum path weight from `source` to every vertex of `dag`.
///
/// Defined only for acyclic graphs; see the module docs for cyclic input.
/// On the empty graph every source yields an empty result.
///
/// # Errors
///
/// - [`GraphError::SourceOutOfRange`] if `source` is not a vertex.
/// - [`GraphError::WeightOverflow`] if a path sum leaves the `i64` range.
pub fn longest_paths(dag: &Graph, source: usize) -> Result<Distances, GraphError> {
    single_source(dag, source, PathKind::Longest, &mut NoopMetrics)
}

/// [`longest_paths`] with instrumentation.
///
/// # Errors
///
/// See [`longest_paths`].
pub fn longest_paths_with_metrics(
    dag: &Graph,
    source: usize,
    metrics: &mut dyn MetricsSink,
) -> Result<Distances, GraphError> {
    single_source(dag, source, PathKind::Longest, metrics)
}

#[instrument(skip_all, fields(kind = %kind, source = source, vertices = dag.vertex_count()))]
fn single_source(
    dag: &Graph,
    source: usize,
    kind: PathKind,
    metrics: &mut dyn MetricsSink,
) -> Result<Distances, GraphError> {
    let n = dag.vertex_count();
    if n == 0 {
        return Ok(Distances {
            kind,
            source: None,
            values: Vec::new(),
        });
    }
    if source >= n {
        return Err(GraphError::SourceOutOfRange {
            vertex: source,
            vertex_count: n,
        });
    }

    metrics.start_timer();

    let adjacency = Adjacency::build(dag);
    let order = topo::kahn(dag, &adjacency, metrics);
    if order.has_cycle {
        warn!(
            ordered = order.order.len(),
            vertices = n,
            "distances requested on a cyclic graph; only the acyclic prefix is relaxed"
        );
    }

    let mut dist: Vec<Option<i64>> = vec![None; n];
    dist[source] = Some(0);

    for &u in &order.order {
        let Some(du) = dist[u] else {
            continue;
        };
        for (v, w) in adjacency.out_edges(u) {
            let candidate = du
                .checked_add(w)
                .ok_or(GraphError::WeightOverflow { from: u, to: v })?;
            if dist[v].is_none_or(|dv| kind.improves(candidate, dv)) {
                dist[v] = Some(candidate);
                metrics.increment(counters::EDGE_RELAXATIONS);
            }
        }
    }

    Ok(Distances {
        kind,
        source: Some(source),
        values: dist.into_iter().map(Distance::from).collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
