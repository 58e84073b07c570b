//! End-to-end analysis of one loaded graph.
//!
//! # Stages
//!
//! 1. SCC decomposition of the input graph.
//! 2. Condensation: one vertex per component, unit-weight edges.
//! 3. Topological order of the condensation.
//! 4. Critical path of the condensation.
//! 5. Shortest and longest distances from the component holding the input's
//!    source vertex.
//!
//! The condensation is acyclic by construction, so stages 3 to 5 always run
//! on a DAG whatever the input looked like. All stages share one metrics
//! sink; the pipeline adds `scc_components` and `critical_path_length` on
//! top of the per-algorithm counters.

use serde::Serialize;
use tracing::{info, instrument};

use crate::critical_path::{self, CriticalPath};
use crate::error::GraphError;
use crate::graph::{Edge, Graph};
use crate::ingest::GraphInput;
use crate::metrics::{MetricsSink, counters};
use crate::paths::{self, Distances};
use crate::scc;
use crate::topo::{self, TopoResult};

/// Shape of one graph in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub vertices: usize,
    pub edges: usize,
    pub directed: bool,
    pub weight_model: String,
}

impl GraphSummary {
    fn of(graph: &Graph) -> Self {
        Self {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            directed: graph.is_directed(),
            weight_model: graph.weight_model().to_string(),
        }
    }
}

/// Condensation stage output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CondensationReport {
    #[serde(flatten)]
    pub summary: GraphSummary,
    /// Condensation edges in emission order.
    pub edge_list: Vec<Edge>,
}

/// Everything one [`analyze`] run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// BLAKE3 hash of the input graph, see [`Graph::content_hash`].
    pub content_hash: String,
    pub graph: GraphSummary,
    /// Source vertex of the input graph.
    pub source: Option<usize>,
    /// Components in closing order; component `i` is condensation vertex `i`.
    pub components: Vec<Vec<usize>>,
    pub condensation: CondensationReport,
    pub topological_order: TopoResult,
    pub critical_path: CriticalPath,
    /// Condensation vertex used as the distance source.
    pub source_component: Option<usize>,
    pub shortest: Distances,
    pub longest: Distances,
}

impl AnalysisReport {
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Components with more than one member, i.e. dependency cycles.
    #[must_use]
    pub fn cyclic_components(&self) -> Vec<&[usize]> {
        self.components
            .iter()
            .filter(|members| members.len() > 1)
            .map(Vec::as_slice)
            .collect()
    }
}

/// Run every stage over `input`.
///
/// # Errors
///
/// - [`GraphError::SourceOutOfRange`] if `input.source` is not a vertex.
/// - [`GraphError::WeightOverflow`] from the path stages.
#[instrument(skip_all, fields(vertices = input.graph.vertex_count(), edges = input.graph.edge_count()))]
pub fn analyze(
    input: &GraphInput,
    metrics: &mut dyn MetricsSink,
) -> Result<AnalysisReport, GraphError> {
    let graph = &input.graph;
    metrics.start_timer();

    if let Some(vertex) = input.source.filter(|&v| v >= graph.vertex_count()) {
        return Err(GraphError::SourceOutOfRange {
            vertex,
            vertex_count: graph.vertex_count(),
        });
    }

    let sccs = scc::find_sccs_with_metrics(graph, metrics);
    let component_count = i64::try_from(sccs.component_count()).unwrap_or(i64::MAX);
    metrics.add(counters::SCC_COMPONENTS, component_count);

    let condensed = sccs.condensation_with_metrics(graph, metrics)?;
    let order = topo::sort_with_metrics(&condensed, metrics);
    let critical = critical_path::find_critical_path_with_metrics(&condensed, metrics)?;
    metrics.add(counters::CRITICAL_PATH_LENGTH, critical.total_weight);

    // A document without a source starts from vertex 0.
    let source_component = sccs.component_of(input.source.unwrap_or(0));
    let distance_source = source_component.unwrap_or(0);
    let shortest = paths::shortest_paths_with_metrics(&condensed, distance_source, metrics)?;
    let longest = paths::longest_paths_with_metrics(&condensed, distance_source, metrics)?;

    info!(
        components = sccs.component_count(),
        condensation_edges = condensed.edge_count(),
        critical_weight = critical.total_weight,
        "analysis complete"
    );

    Ok(AnalysisReport {
        content_hash: graph.content_hash(),
        graph: GraphSummary::of(graph),
        source: input.source,
        condensation: CondensationReport {
            summary: GraphSummary::of(&condensed),
            edge_list: condensed.edges().to_vec(),
        },
        components: sccs.into_components(),
        topological_order: order,
        critical_path: critical,
        source_component,
        shortest,
        longest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use crate::paths::Distance;

    /// Three cycles of decreasing size chained together: {0,1,2} -> {3,4,5}
    /// -> 6 -> 7.
    fn pipeline_graph() -> GraphInput {
        let graph = Graph::from_edges(
            8,
            [
                (0, 1, 2),
                (1, 2, 3),
                (2, 0, 1),
                (1, 3, 5),
                (3, 4, 2),
                (4, 5, 1),
                (5, 3, 1),
                (4, 6, 4),
                (6, 7, 3),
            ],
        )
        .expect("valid");
        GraphInput {
            graph,
            source: Some(0),
        }
    }

    #[test]
    fn pipeline_condenses_and_schedules() {
        let mut metrics = Metrics::new();
        let report = analyze(&pipeline_graph(), &mut metrics).expect("valid input");

        assert_eq!(report.component_count(), 4);
        assert_eq!(report.cyclic_components().len(), 2);
        assert_eq!(report.condensation.summary.vertices, 4);
        assert_eq!(report.condensation.edge_list.len(), 3);
        assert!(!report.topological_order.has_cycle);
        assert_eq!(report.topological_order.order.len(), 4);

        // The condensation is a 4-vertex chain of unit edges.
        assert_eq!(report.critical_path.path.len(), 4);
        assert_eq!(report.critical_path.total_weight, 3);

        assert_eq!(metrics.counter(counters::SCC_COMPONENTS), 4);
        assert_eq!(metrics.counter(counters::CRITICAL_PATH_LENGTH), 3);
        assert_eq!(metrics.counter(counters::COND_EDGES), 3);
        assert_eq!(metrics.counter(counters::DFS_VISITS), 8);
    }

    #[test]
    fn distances_start_from_the_source_component() {
        let report = analyze(&pipeline_graph(), &mut Metrics::new()).expect("valid");
        let src = report.source_component.expect("non-empty graph");
        assert_eq!(report.components[src], vec![0, 1, 2]);
        assert_eq!(report.shortest.get(src), Some(Distance::Finite(0)));
        assert_eq!(report.shortest.reachable_count(), 4);
        assert_eq!(report.longest.reachable_count(), 4);
    }

    #[test]
    fn downstream_source_leaves_upstream_unreachable() {
        let mut input = pipeline_graph();
        input.source = Some(6);
        let report = analyze(&input, &mut Metrics::new()).expect("valid");
        let src = report.source_component.expect("non-empty graph");
        assert_eq!(report.components[src], vec![6]);
        assert_eq!(report.shortest.reachable_count(), 2);
    }

    #[test]
    fn empty_graph_yields_empty_report() {
        let input = GraphInput {
            graph: Graph::directed(0),
            source: None,
        };
        let report = analyze(&input, &mut Metrics::new()).expect("empty is fine");
        assert_eq!(report.component_count(), 0);
        assert!(report.critical_path.is_empty());
        assert!(report.shortest.is_empty());
        assert_eq!(report.source_component, None);
    }

    #[test]
    fn source_outside_graph_is_rejected() {
        let mut input = pipeline_graph();
        input.source = Some(8);
        assert_eq!(
            analyze(&input, &mut Metrics::new()),
            Err(GraphError::SourceOutOfRange {
                vertex: 8,
                vertex_count: 8
            })
        );
    }

    #[test]
    fn report_serializes_with_null_for_unreachable() {
        let mut input = pipeline_graph();
        input.source = Some(7);
        let report = analyze(&input, &mut Metrics::new()).expect("valid");
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json["content_hash"].as_str().expect("string").starts_with("blake3:"));
        assert_eq!(json["condensation"]["vertices"], 4);
        let values = json["shortest"]["values"].as_array().expect("array");
        assert_eq!(values.iter().filter(|v| v.is_null()).count(), 3);
    }
}
