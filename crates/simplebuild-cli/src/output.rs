//! Table and JSON output for CLI commands.
//!
//! Stdout carries one document per command: tables in table mode, a single
//! JSON value in JSON mode. Status lines only appear in table mode and
//! errors always go to stderr.

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output, nothing else on stdout
    Json,
}

/// One row of a flattened item.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct Field {
    /// Dotted path, e.g. `editor.timeout_seconds` or `hooks[0].name`
    #[tabled(rename = "Key")]
    pub key: String,
    /// Rendered value
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Renders a list of rows.
pub fn render_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table if items.is_empty() => "No results found.".to_string(),
        OutputFormat::Table => Table::new(items).to_string(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

/// Renders a single item. Table mode flattens it into key/value rows.
pub fn render_item<T: Serialize>(item: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let value = serde_json::to_value(item).unwrap_or(Value::Null);
            let mut fields = Vec::new();
            flatten("", &value, &mut fields);
            Table::new(fields).to_string()
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Flattens nested objects into dotted keys. Arrays of scalars are joined,
/// arrays of objects are indexed.
pub fn flatten(prefix: &str, value: &Value, fields: &mut Vec<Field>) {
    let rendered = match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&key, child, fields);
            }
            return;
        }
        Value::Array(items) if items.iter().any(|i| i.is_object() || i.is_array()) => {
            for (index, child) in items.iter().enumerate() {
                flatten(&format!("{prefix}[{index}]"), child, fields);
            }
            return;
        }
        Value::Array(items) if !items.is_empty() => {
            items.iter().map(scalar).collect::<Vec<_>>().join(", ")
        }
        other => scalar(other),
    };

    fields.push(Field {
        key: prefix.to_string(),
        value: rendered,
    });
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null | Value::Array(_) | Value::Object(_) => "-".to_string(),
        other => other.to_string(),
    }
}

/// Status line for table mode; `None` in JSON mode.
pub fn status_line(symbol: char, msg: &str, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Table => Some(format!("{symbol} {msg}")),
        OutputFormat::Json => None,
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    println!("{}", render_list(items, format));
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    println!("{}", render_item(item, format));
}

/// Print a success message
pub fn print_success(msg: &str, format: OutputFormat) {
    if let Some(line) = status_line('✓', msg, format) {
        println!("{line}");
    }
}

/// Print a warning message
pub fn print_warning(msg: &str, format: OutputFormat) {
    if let Some(line) = status_line('⚠', msg, format) {
        println!("{line}");
    }
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}
