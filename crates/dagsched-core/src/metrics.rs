//! Write-only instrumentation sink injected into the algorithms.
//!
//! Every algorithm has a plain entry point and a `*_with_metrics` variant
//! that takes `&mut dyn MetricsSink`. The sink only receives events; nothing
//! an algorithm computes depends on it, so passing [`NoopMetrics`] (what the
//! plain entry points do) yields identical results.
//!
//! [`Metrics`] is the recording implementation used by the CLI: named
//! counters in a `BTreeMap` (stable report order) plus a wall-clock timer.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::json;

/// Counter names emitted by the engine.
pub mod counters {
    /// Vertices discovered by the SCC traversal.
    pub const DFS_VISITS: &str = "dfs_visits";
    /// Successful distance improvements in the DAG DPs.
    pub const EDGE_RELAXATIONS: &str = "edge_relaxations";
    /// Components produced by SCC decomposition.
    pub const SCC_COMPONENTS: &str = "scc_components";
    /// Vertices dequeued by the topological sorter.
    pub const TOPO_POPS: &str = "topo_pops";
    /// Edges emitted into a condensation graph.
    pub const COND_EDGES: &str = "cond_edges";
    /// Total weight of the reported critical path.
    pub const CRITICAL_PATH_LENGTH: &str = "critical_path_length";
    /// Topological sorts that stopped short because of a cycle.
    pub const CYCLE_DETECTED: &str = "cycle_detected";
}

/// Receiver for timer and counter events.
pub trait MetricsSink {
    /// Mark the start of a timed region.
    fn start_timer(&mut self);

    /// Add one to the named counter.
    fn increment(&mut self, counter: &str);

    /// Add `delta` to the named counter.
    fn add(&mut self, counter: &str, delta: i64);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn start_timer(&mut self) {}

    fn increment(&mut self, _counter: &str) {}

    fn add(&mut self, _counter: &str, _delta: i64) {}
}

// ---------------------------------------------------------------------------
// Recording sink
// ---------------------------------------------------------------------------

/// Recording sink: named counters plus elapsed time.
///
/// The timer starts on the first [`MetricsSink::start_timer`] call and keeps
/// running until [`Metrics::reset`], so a multi-stage pipeline sharing one
/// `Metrics` reports time since its first stage began.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    started_at: Option<Instant>,
    operation_count: u64,
    counters: BTreeMap<String, i64>,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the timer was first started, or zero if it never was.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }

    /// Number of [`MetricsSink::increment`] calls across all counters.
    #[must_use]
    pub const fn operation_count(&self) -> u64 {
        self.operation_count
    }

    /// Current value of `counter` (zero when never touched).
    #[must_use]
    pub fn counter(&self, counter: &str) -> i64 {
        self.counters.get(counter).copied().unwrap_or(0)
    }

    /// All counters in name order.
    #[must_use]
    pub const fn counters(&self) -> &BTreeMap<String, i64> {
        &self.counters
    }

    /// Clear the timer and every counter.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.operation_count = 0;
        self.counters.clear();
    }

    /// Snapshot the current state into a renderable report.
    #[must_use]
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            elapsed: self.elapsed(),
            operation_count: self.operation_count,
            counters: self
                .counters
                .iter()
                .map(|(name, value)| (name.clone(), *value))
                .collect(),
        }
    }
}

impl MetricsSink for Metrics {
    fn start_timer(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn increment(&mut self, counter: &str) {
        self.operation_count = self.operation_count.saturating_add(1);
        let entry = self.counters.entry(counter.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    fn add(&mut self, counter: &str, delta: i64) {
        let entry = self.counters.entry(counter.to_string()).or_insert(0);
        *entry = entry.saturating_add(delta);
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Point-in-time view of a [`Metrics`] recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsReport {
    #[serde(serialize_with = "serialize_micros", rename = "elapsed_us")]
    pub elapsed: Duration,
    pub operation_count: u64,
    pub counters: Vec<(String, i64)>,
}

fn serialize_micros<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_micros())
}

impl MetricsReport {
    /// Render the report as JSON with counters as an object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let counters: serde_json::Map<String, serde_json::Value> = self
            .counters
            .iter()
            .map(|(name, value)| (name.clone(), json!(value)))
            .collect();

        json!({
            "elapsed_us": self.elapsed.as_micros(),
            "operation_count": self.operation_count,
            "counters": counters,
        })
    }

    /// Render the report as a simple table for terminal output.
    #[must_use]
    pub fn display_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total operations: {}", self.operation_count);
        let _ = writeln!(out, "Elapsed: {} us", self.elapsed.as_micros());

        if self.counters.is_empty() {
            out.push_str("No counters recorded.\n");
            return out;
        }

        let width = self
            .counters
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("counter".len());

        let _ = writeln!(out, "{:<width$}  {:>12}", "counter", "value");
        let _ = writeln!(out, "{:-<width$}  {:->12}", "", "");
        for (name, value) in &self.counters {
            let _ = writeln!(out, "{name:<width$}  {value:>12}");
        }
        out
    }
}
