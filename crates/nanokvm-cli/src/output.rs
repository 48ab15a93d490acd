//! Output formatting: table, JSON, plain.
//!
//! Renders coordinator state in the format selected by `--output`.
//! Table uses `tabled`, structured formats use serde_json, plain emits
//! one `key=value` per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};
use tabled::{Table, Tabled, settings::Style};

use nanokvm_core::{CoordinatorState, EntityValue, ProjectionKind, projection};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Status rendering ─────────────────────────────────────────────────

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "ENTITY")]
    name: String,
    #[tabled(rename = "KIND")]
    kind: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
}

fn kind_label(kind: ProjectionKind) -> &'static str {
    match kind {
        ProjectionKind::BinarySensor => "binary_sensor",
        ProjectionKind::Sensor => "sensor",
    }
}

fn paint(value: &EntityValue, color: bool) -> String {
    if !color {
        return value.to_string();
    }
    match value {
        EntityValue::Bool(true) => value.green().to_string(),
        EntityValue::Bool(false) => value.dimmed().to_string(),
        EntityValue::Unavailable => value.yellow().to_string(),
        _ => value.to_string(),
    }
}

/// Render the full projection set over a coordinator state.
pub fn render_status(state: &CoordinatorState, format: &OutputFormat, color: bool) -> String {
    match format {
        OutputFormat::Table => {
            let rows: Vec<EntityRow> = projection::all()
                .map(|p| EntityRow {
                    name: p.name.to_string(),
                    kind: kind_label(p.kind),
                    value: paint(&p.project(state), color),
                })
                .collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json(&status_json(state), false),
        OutputFormat::JsonCompact => render_json(&status_json(state), true),
        OutputFormat::Plain => projection::all()
            .map(|p| format!("{}={}", p.key, p.project(state)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Structured view: typed entity values plus coordinator health fields.
fn status_json(state: &CoordinatorState) -> Value {
    let mut entities = Map::new();
    for p in projection::all() {
        entities.insert(p.key.to_string(), entity_json(&p.project(state)));
    }

    json!({
        "entities": Value::Object(entities),
        "last_success": state.last_success.map(|t| t.to_rfc3339()),
        "last_error": state.last_error,
        "consecutive_failures": state.consecutive_failures,
    })
}

fn entity_json(value: &EntityValue) -> Value {
    match value {
        EntityValue::Unavailable => Value::Null,
        EntityValue::Bool(b) => json!(b),
        EntityValue::Text(s) => json!(s),
        EntityValue::Seconds(s) => json!(s),
    }
}

// ── Generic renderers ────────────────────────────────────────────────

pub fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
