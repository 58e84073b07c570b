//! Output layer shared by every command: pretty sections for humans, compact
//! text for pipes, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format`
//! 2. `DAGSCHED_FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `[report] format` in the config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in pretty output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<16} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Compact plain text for pipes and scripts.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Parse a mode name, case-insensitively. Unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    format_env: Option<&str>,
    config_format: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    // Unknown values fall through to the next source.
    if let Some(mode) = format_env.and_then(OutputMode::parse) {
        return mode;
    }
    if let Some(mode) = config_format.and_then(OutputMode::parse) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from the flag, environment, config and TTY.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    config_format: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("DAGSCHED_FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, env_val.as_deref(), config_format, is_tty)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render a failure to stderr.
///
/// JSON mode writes `{"error": {"message": ..}}`; the other modes write a
/// single `error: <message>` line.
pub fn render_error(mode: OutputMode, error: &anyhow::Error) -> io::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let message = format!("{error:#}");
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": { "message": message } });
            writeln!(out, "{wrapper}")
        }
        OutputMode::Pretty | OutputMode::Text => writeln!(out, "error: {message}"),
    }
}
