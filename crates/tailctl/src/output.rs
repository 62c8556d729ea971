//! Output formatting: table, JSON, YAML, raw.
//!
//! Renders API responses in the format selected by `--output`. Table uses
//! `tabled` over typed rows; JSON and YAML re-encode the response body so no
//! field the API returns is dropped; raw emits the body exactly as received.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};
use tailctl_api::ApiResponse;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Whether stderr status messages should be colored.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Print a success line to stderr, green when color is on.
pub fn success(message: &str, color: ColorMode, quiet: bool) {
    if quiet {
        return;
    }
    if should_color(color) {
        eprintln!("{} {message}", "✓".green());
    } else {
        eprintln!("✓ {message}");
    }
}

/// Print a warning line to stderr, yellow when color is on.
pub fn warning(message: &str, color: ColorMode) {
    if should_color(color) {
        eprintln!("{} {message}", "!".yellow().bold());
    } else {
        eprintln!("! {message}");
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list response.
///
/// `to_rows` is only invoked for table output; it parses the typed model out
/// of the response and maps it to `Tabled` rows.
pub fn render_list<R>(
    format: OutputFormat,
    resp: &ApiResponse,
    to_rows: impl FnOnce(&ApiResponse) -> Result<Vec<R>, CliError>,
) -> Result<String, CliError>
where
    R: Tabled,
{
    match format {
        OutputFormat::Table => Ok(render_table(&to_rows(resp)?)),
        other => render_body(other, resp),
    }
}

/// Render a single-object response.
///
/// `detail_fn` builds the table-mode detail view; it is not called for
/// structured formats.
pub fn render_single(
    format: OutputFormat,
    resp: &ApiResponse,
    detail_fn: impl FnOnce(&ApiResponse) -> Result<String, CliError>,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => detail_fn(resp),
        other => render_body(other, resp),
    }
}

/// Render any serializable value (used for local data such as config).
pub fn render_value<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
    detail: impl FnOnce(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(detail(data)),
        OutputFormat::Json | OutputFormat::Raw => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Structured rendering straight from the response body.
fn render_body(format: OutputFormat, resp: &ApiResponse) -> Result<String, CliError> {
    if format == OutputFormat::Raw {
        return Ok(resp.text());
    }
    if resp.bytes().is_empty() {
        return Ok(String::new());
    }
    let value = resp.json_value()?;
    match format {
        OutputFormat::JsonCompact => Ok(serde_json::to_string(&value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&value)?),
        _ => Ok(serde_json::to_string_pretty(&value)?),
    }
}

/// Render label/value pairs as aligned `label: value` lines.
pub fn detail_lines(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    pairs
        .iter()
        .map(|(k, v)| format!("{:<width$} {v}", format!("{k}:")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `-` for missing or empty values.
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => "-".into(),
    }
}
