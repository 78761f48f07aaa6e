//! Envelope rendering: pretty JSON or a key-column table.

use crate::args::OutputFormat;
use fortigate_client::envelope::{Payload, ResultEnvelope};
use serde_json::Value;

/// Render an envelope for display.
pub fn render(envelope: &ResultEnvelope, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(envelope).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputFormat::Table => render_table(envelope),
    }
}

fn render_table(envelope: &ResultEnvelope) -> String {
    if let Some(error) = &envelope.error {
        return format!("error ({}): {}", error.kind, error.message);
    }
    let mut out = match &envelope.data {
        Some(Payload::Records(records)) => records_table(records),
        Some(Payload::Record(record)) => record_rows(record),
        Some(Payload::Status(status)) => status.to_string(),
        None => String::from("ok"),
    };
    if let Some(cursor) = &envelope.cursor {
        out.push_str(&format!("\ncursor: {}", cursor));
    }
    out
}

/// Align records into columns keyed by field name, ordered by first
/// appearance across the record set.
fn records_table(records: &[Value]) -> String {
    if records.is_empty() {
        return String::from("(no results)");
    }

    let mut columns: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(obj) = record {
            for key in obj.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    if columns.is_empty() {
        // Non-object records: one per line.
        return records.iter().map(cell_text).collect::<Vec<_>>().join("\n");
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (i, column) in columns.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", column, width = widths[i]));
    }
    out.push('\n');
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn record_rows(record: &Value) -> String {
    match record {
        Value::Object(obj) => {
            let width = obj.keys().map(String::len).max().unwrap_or(0);
            obj.iter()
                .map(|(key, value)| format!("{:<width$}  {}", key, cell_text(value), width = width))
                .collect::<Vec<_>>()
                .join("\n")
        }
        other => cell_text(other),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
