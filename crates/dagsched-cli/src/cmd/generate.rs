//! `dagsched generate`: write the built-in catalog or a seeded random graph
//! as graph documents.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use dagsched_core::{Graph, GraphDocument};
use dagsched_sim::{RandomGraphConfig, catalog, generate};
use serde::Serialize;
use tracing::info;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dagsched generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(subcommand)]
    pub command: GenerateCommand,
}

#[derive(Subcommand, Debug)]
pub enum GenerateCommand {
    /// Write the nine catalog datasets as `<name>.json` files.
    Catalog(CatalogArgs),
    /// Generate one seeded random graph.
    Random(RandomArgs),
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Directory to write into; created if missing.
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct RandomArgs {
    #[arg(long)]
    pub vertices: usize,

    #[arg(long)]
    pub edges: usize,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Allow back edges and self-loops.
    #[arg(long)]
    pub cyclic: bool,

    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub min_weight: i64,

    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub max_weight: i64,

    /// Output file; the document goes to stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct WrittenFile {
    name: String,
    path: String,
    vertices: usize,
    edges: usize,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    files: Vec<WrittenFile>,
}

/// Execute `dagsched generate`.
pub fn run_generate(args: &GenerateArgs, output: OutputMode, quiet: bool) -> anyhow::Result<()> {
    match &args.command {
        GenerateCommand::Catalog(args) => run_catalog(args, output, quiet),
        GenerateCommand::Random(args) => run_random(args, output, quiet),
    }
}

fn run_catalog(args: &CatalogArgs, output: OutputMode, quiet: bool) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let mut files = Vec::new();
    for dataset in catalog::all()? {
        let path = args.out.join(format!("{}.json", dataset.name));
        write_document(&dataset.graph, &path)?;
        files.push(written(dataset.name, &path, &dataset.graph));
    }
    info!(count = files.len(), dir = %args.out.display(), "catalog written");

    report(output, quiet, &GenerateOutput { files })
}

fn run_random(args: &RandomArgs, output: OutputMode, quiet: bool) -> anyhow::Result<()> {
    let config = RandomGraphConfig {
        vertices: args.vertices,
        edges: args.edges,
        min_weight: args.min_weight,
        max_weight: args.max_weight,
        acyclic: !args.cyclic,
        seed: args.seed,
    };
    let graph = generate(&config)?;

    let Some(path) = &args.out else {
        let json = GraphDocument::from_graph(&graph, source_for(&graph)).to_json_pretty()?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{json}")?;
        return Ok(());
    };

    write_document(&graph, path)?;
    let name = path
        .file_stem()
        .map_or_else(|| "random".to_string(), |s| s.to_string_lossy().into_owned());
    let files = vec![written(name, path, &graph)];
    report(output, quiet, &GenerateOutput { files })
}

fn write_document(graph: &Graph, path: &Path) -> anyhow::Result<()> {
    let json = GraphDocument::from_graph(graph, source_for(graph)).to_json_pretty()?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Documents name vertex 0 as the source whenever the graph has one.
const fn source_for(graph: &Graph) -> Option<usize> {
    if graph.is_empty() { None } else { Some(0) }
}

fn written(name: String, path: &Path, graph: &Graph) -> WrittenFile {
    WrittenFile {
        name,
        path: path.display().to_string(),
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
    }
}

fn report(output: OutputMode, quiet: bool, payload: &GenerateOutput) -> anyhow::Result<()> {
    if quiet && output != OutputMode::Json {
        return Ok(());
    }
    render_mode(output, payload, render_generate_text, render_generate_pretty)
}

fn render_generate_text(payload: &GenerateOutput, w: &mut dyn Write) -> io::Result<()> {
    for file in &payload.files {
        writeln!(
            w,
            "wrote {} n={} edges={}",
            file.path, file.vertices, file.edges
        )?;
    }
    Ok(())
}

fn render_generate_pretty(payload: &GenerateOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Generated datasets ({})", payload.files.len()))?;
    for file in &payload.files {
        pretty_kv(
            w,
            &file.name,
            format!("{} vertices, {} edges", file.vertices, file.edges),
        )?;
    }
    Ok(())
}
