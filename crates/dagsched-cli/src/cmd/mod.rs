//! Subcommand implementations. Each module owns its clap args and a
//! `run_*` entry point.

pub mod analyze;
pub mod generate;
