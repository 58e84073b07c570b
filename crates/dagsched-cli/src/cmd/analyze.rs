//! `dagsched analyze`: run the full analysis pipeline on a graph document.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use dagsched_core::metrics::MetricsReport;
use dagsched_core::pipeline::AnalysisReport;
use dagsched_core::{Distance, Distances, Metrics, MetricsSink, PathKind, analyze, load_graph};
use serde::Serialize;
use tracing::debug;

use crate::config::DagschedConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dagsched analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Graph document (JSON).
    pub file: PathBuf,

    /// Source vertex for the distance stages; overrides the document and config.
    #[arg(long)]
    pub source: Option<usize>,

    /// Include engine counters and elapsed time.
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<serde_json::Value>,
    #[serde(skip)]
    metrics_table: Option<String>,
}

/// Execute `dagsched analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &DagschedConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut metrics = Metrics::new();
    metrics.start_timer();

    let mut input = load_graph(&args.file)?;
    if let Some(source) = args.source.or(config.analysis.source) {
        debug!(source, "source vertex overridden");
        input.source = Some(source);
    }

    let report = analyze(&input, &mut metrics)
        .with_context(|| format!("failed to analyze {}", args.file.display()))?;

    let include_metrics = args.metrics || config.report.metrics;
    let snapshot = include_metrics.then(|| metrics.report());
    let payload = AnalyzeOutput {
        report: &report,
        metrics: snapshot.as_ref().map(MetricsReport::to_json),
        metrics_table: snapshot.as_ref().map(MetricsReport::display_table),
    };

    render_mode(output, &payload, render_analysis_text, render_analysis_pretty)
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

fn render_analysis_text(payload: &AnalyzeOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    let r = payload.report;
    writeln!(
        w,
        "graph n={} edges={} directed={} weight_model={} source={}",
        r.graph.vertices,
        r.graph.edges,
        r.graph.directed,
        r.graph.weight_model,
        optional(r.source)
    )?;
    writeln!(w, "hash {}", r.content_hash)?;
    writeln!(w, "components {}", r.component_count())?;
    for (id, members) in r.components.iter().enumerate() {
        writeln!(w, "  {id}: {members:?}")?;
    }
    writeln!(
        w,
        "condensation n={} edges={}",
        r.condensation.summary.vertices, r.condensation.summary.edges
    )?;
    writeln!(
        w,
        "order {:?} has_cycle={}",
        r.topological_order.order, r.topological_order.has_cycle
    )?;
    writeln!(
        w,
        "critical_path {:?} weight={}",
        r.critical_path.path, r.critical_path.total_weight
    )?;
    write_distances_text(w, &r.shortest)?;
    write_distances_text(w, &r.longest)?;

    if let Some(table) = &payload.metrics_table {
        write!(w, "{table}")?;
    }
    Ok(())
}

fn write_distances_text(w: &mut dyn Write, distances: &Distances) -> io::Result<()> {
    write!(w, "{} from={}", distances.kind(), optional(distances.source()))?;
    for v in 0..distances.len() {
        if let Some(label) = distances.label(v) {
            write!(w, " {v}={label}")?;
        }
    }
    writeln!(w)
}

// ---------------------------------------------------------------------------
// Pretty
// ---------------------------------------------------------------------------

fn render_analysis_pretty(payload: &AnalyzeOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    let r = payload.report;

    pretty_section(w, "Loaded graph")?;
    pretty_kv(w, "vertices", r.graph.vertices.to_string())?;
    pretty_kv(w, "edges", r.graph.edges.to_string())?;
    pretty_kv(w, "directed", r.graph.directed.to_string())?;
    pretty_kv(w, "weight model", &r.graph.weight_model)?;
    pretty_kv(w, "source", optional(r.source))?;
    pretty_kv(w, "hash", &r.content_hash)?;
    writeln!(w)?;

    pretty_section(
        w,
        &format!("Strongly connected components ({})", r.component_count()),
    )?;
    for (id, members) in r.components.iter().enumerate() {
        writeln!(w, "  Component {id}: {members:?}")?;
    }
    writeln!(w)?;

    pretty_section(w, "Condensation graph")?;
    pretty_kv(w, "vertices", r.condensation.summary.vertices.to_string())?;
    pretty_kv(w, "edges", r.condensation.summary.edges.to_string())?;
    for edge in &r.condensation.edge_list {
        writeln!(w, "  {} -> {}", edge.source(), edge.target())?;
    }
    writeln!(w)?;

    pretty_section(w, "Topological order")?;
    pretty_kv(w, "order", format!("{:?}", r.topological_order.order))?;
    pretty_kv(w, "has cycle", r.topological_order.has_cycle.to_string())?;
    writeln!(w)?;

    pretty_section(w, "Critical path")?;
    pretty_kv(w, "path", format!("{:?}", r.critical_path.path))?;
    pretty_kv(w, "total weight", r.critical_path.total_weight.to_string())?;
    writeln!(w)?;

    write_distances_pretty(w, &r.shortest)?;
    write_distances_pretty(w, &r.longest)?;

    pretty_section(w, "Summary")?;
    pretty_kv(w, "vertices", r.graph.vertices.to_string())?;
    pretty_kv(w, "edges", r.graph.edges.to_string())?;
    pretty_kv(w, "components", r.component_count().to_string())?;
    pretty_kv(w, "cyclic groups", r.cyclic_components().len().to_string())?;
    pretty_kv(w, "cond. vertices", r.condensation.summary.vertices.to_string())?;
    pretty_kv(w, "cond. edges", r.condensation.summary.edges.to_string())?;
    pretty_kv(w, "critical length", r.critical_path.total_weight.to_string())?;

    if let Some(table) = &payload.metrics_table {
        writeln!(w)?;
        pretty_section(w, "Metrics")?;
        write!(w, "{table}")?;
    }
    Ok(())
}

fn write_distances_pretty(w: &mut dyn Write, distances: &Distances) -> io::Result<()> {
    let heading = match distances.kind() {
        PathKind::Shortest => "Shortest paths",
        PathKind::Longest => "Longest paths",
    };
    pretty_section(
        w,
        &format!("{heading} from component {}", optional(distances.source())),
    )?;
    for (v, distance) in distances.as_slice().iter().enumerate() {
        match distance {
            Distance::Finite(d) => writeln!(w, "  To {v}: {d}")?,
            Distance::Unreachable => writeln!(
                w,
                "  To {v}: {} (unreachable)",
                distances.kind().unreachable_label()
            )?,
        }
    }
    writeln!(w)
}

fn optional(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagsched_core::{GraphInput, NoopMetrics, parse_graph};

    fn report() -> AnalysisReport {
        let input: GraphInput = parse_graph(
            r#"{ "n": 4, "source": 0,
                 "edges": [ {"u": 0, "v": 1, "w": 2}, {"u": 1, "v": 0, "w": 1},
                            {"u": 1, "v": 2, "w": 4} ] }"#,
        )
        .expect("valid");
        analyze(&input, &mut NoopMetrics).expect("valid")
    }

    fn render(
        f: fn(&AnalyzeOutput<'_>, &mut dyn Write) -> io::Result<()>,
        payload: &AnalyzeOutput<'_>,
    ) -> String {
        let mut out = Vec::new();
        f(payload, &mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn analyze_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AnalyzeArgs,
        }

        let parsed = Wrapper::parse_from(["test", "g.json", "--source", "3", "--metrics"]);
        assert_eq!(parsed.args.file, PathBuf::from("g.json"));
        assert_eq!(parsed.args.source, Some(3));
        assert!(parsed.args.metrics);
    }

    #[test]
    fn text_marks_unreachable_with_directional_infinity() {
        let report = report();
        let payload = AnalyzeOutput {
            report: &report,
            metrics: None,
            metrics_table: None,
        };
        let text = render(render_analysis_text, &payload);
        assert!(text.contains("components 3"), "{text}");
        assert!(text.contains("=INF"), "{text}");
        assert!(text.contains("=-INF"), "{text}");
        assert!(!text.contains("Total operations"));
    }

    #[test]
    fn pretty_has_every_section() {
        let report = report();
        let payload = AnalyzeOutput {
            report: &report,
            metrics: None,
            metrics_table: Some(Metrics::new().report().display_table()),
        };
        let text = render(render_analysis_pretty, &payload);
        for heading in [
            "Loaded graph",
            "Strongly connected components (3)",
            "Condensation graph",
            "Topological order",
            "Critical path",
            "Shortest paths from component",
            "Longest paths from component",
            "Summary",
            "Metrics",
        ] {
            assert!(text.contains(heading), "missing {heading}:\n{text}");
        }
        assert!(text.contains("(unreachable)"));
    }

    #[test]
    fn json_flattens_report_and_skips_absent_metrics() {
        let report = report();
        let payload = AnalyzeOutput {
            report: &report,
            metrics: None,
            metrics_table: Some("ignored".to_string()),
        };
        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["graph"]["vertices"], 4);
        assert!(json.get("metrics").is_none());
        assert!(json.get("metrics_table").is_none());
    }
}
