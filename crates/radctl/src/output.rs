//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables are built
//! column by column with `tabled`, structured formats use serde, plain
//! emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Row model ────────────────────────────────────────────────────────

/// A table column: header text and alignment.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub numeric: bool,
}

impl Column {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            numeric: false,
        }
    }

    pub const fn numeric(name: &'static str) -> Self {
        Self {
            name,
            numeric: true,
        }
    }
}

/// One listed item: display cells for tables and plain output, and the
/// typed JSON object for structured formats.
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<String>,
    pub json: Value,
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render rows in the chosen format. `plain` prints the first cell of
/// each row.
pub fn render_rows(format: &OutputFormat, columns: &[Column], rows: &[Row]) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(columns, rows)),
        OutputFormat::Plain => Ok(rows
            .iter()
            .filter_map(|row| row.cells.first().cloned())
            .collect::<Vec<_>>()
            .join("\n")),
        structured => {
            let items: Vec<&Value> = rows.iter().map(|row| &row.json).collect();
            render_structured(structured, &items)
        }
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table and plain rendering use `detail_fn`, since detail views are not
/// tabular.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table | OutputFormat::Plain => Ok(detail_fn(data)),
        structured => render_structured(structured, data),
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

fn render_table(columns: &[Column], rows: &[Row]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.name.to_uppercase()));
    for row in rows {
        builder.push_record(row.cells.iter().cloned());
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    for (index, column) in columns.iter().enumerate() {
        if column.numeric {
            table.with(Modify::new(Columns::single(index)).with(Alignment::right()));
        }
    }
    table.to_string()
}

fn render_structured<T: serde::Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(render_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(render_err)?,
        _ => serde_json::to_string_pretty(data).map_err(render_err)?,
    };
    Ok(rendered.trim_end().to_owned())
}

fn render_err(e: impl std::fmt::Display) -> CliError {
    CliError::Render(e.to_string())
}
