#![forbid(unsafe_code)]
//! dagsched-core library.
//!
//! Dependency-graph analysis for task scheduling: strongly connected
//! components and condensation ([`scc`]), topological order with cycle
//! detection ([`topo`]), the critical path ([`critical_path`]) and
//! single-source shortest/longest distances ([`paths`]) over integer-weighted
//! directed graphs ([`graph`]).
//!
//! Every algorithm is a pure function of its input graph. Each has a plain
//! entry point and a `*_with_metrics` twin that reports counters to a
//! [`metrics::MetricsSink`]; the sink never influences results.
//!
//! # Conventions
//!
//! - **Errors**: algorithms return [`GraphError`]; file and document
//!   handling ([`ingest`]) returns `anyhow::Result`.
//! - **Logging**: `tracing` spans on every entry point, `debug!` summaries,
//!   `warn!` when a DAG-only algorithm meets a cycle.

pub mod critical_path;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod metrics;
pub mod paths;
pub mod pipeline;
pub mod scc;
pub mod topo;

pub use critical_path::{CriticalPath, find_critical_path};
pub use error::GraphError;
pub use graph::{Edge, Graph};
pub use ingest::{GraphDocument, GraphInput, load_graph, parse_graph};
pub use metrics::{Metrics, MetricsSink, NoopMetrics};
pub use paths::{Distance, Distances, PathKind, longest_paths, shortest_paths};
pub use pipeline::{AnalysisReport, analyze};
pub use scc::{SccResult, build_condensation_graph, find_sccs};
pub use topo::TopoResult;
