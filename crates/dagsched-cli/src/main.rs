#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dagsched: dependency-graph analysis and scheduling",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides DAGSCHED_FORMAT and the config file).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Config file; defaults to ./dagsched.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Condense, order and measure a graph document.
    Analyze(cmd::analyze::AnalyzeArgs),

    /// Write synthetic graph documents.
    Generate(cmd::generate::GenerateArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DAGSCHED_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "dagsched=debug,info"
        } else {
            "dagsched=info,warn"
        })
    });

    let format = env::var("DAGSCHED_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let working_dir = env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &working_dir)?;
    let output = output::resolve_output_mode(cli.format, config.report.format.as_deref());
    debug!(?output, "output mode resolved");

    match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, &config, output),
        Commands::Generate(args) => cmd::generate::run_generate(args, output, cli.quiet),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Config may be the thing that failed, so only the flag and env count here.
            let mode = output::resolve_output_mode(cli.format, None);
            let _ = output::render_error(mode, &err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["dagsched", "analyze", "g.json", "--format", "json", "-q"]);
        assert!(cli.quiet);
        assert_eq!(cli.format, Some(OutputMode::Json));
        assert!(matches!(cli.command, Commands::Analyze(_)));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from([
            "dagsched",
            "--config",
            "custom.toml",
            "generate",
            "catalog",
            "--out",
            "datasets",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["dagsched", "schedule"]).is_err());
    }
}
