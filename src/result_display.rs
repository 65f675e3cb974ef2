use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;
use serde_json::Value;
use std::io::{self, Write};

use crate::api::outcome::Outcome;

const TITLE: &str = "langnet API Response";

#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions {
    pub use_glyphs: bool,
    pub use_color: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            use_color: false,
        }
    }
}

/// Render an outcome to `out`. In JSON mode a failure is written as its
/// tagged object; the formatted view only shows successes. Use
/// `failure_message` for the error text either way.
pub fn render(
    out: &mut dyn Write,
    outcome: &Outcome,
    json: bool,
    options: DisplayOptions,
) -> io::Result<()> {
    if json {
        render_json(out, outcome)
    } else {
        render_formatted(out, outcome, options)
    }
}

/// Success: the payload itself. Failure: `{"kind": ..., ...fields}`.
pub fn render_json(out: &mut dyn Write, outcome: &Outcome) -> io::Result<()> {
    let text = match outcome.payload() {
        Some(payload) => serde_json::to_string_pretty(payload)?,
        None => serde_json::to_string_pretty(outcome)?,
    };
    writeln!(out, "{}", text)
}

pub fn render_formatted(
    out: &mut dyn Write,
    outcome: &Outcome,
    options: DisplayOptions,
) -> io::Result<()> {
    let Some(payload) = outcome.payload() else {
        return Ok(());
    };

    let mut table = Table::new();
    table
        .load_preset(if options.use_glyphs { UTF8_FULL } else { ASCII_FULL })
        .set_content_arrangement(ContentArrangement::Dynamic);
    if !options.use_color {
        table.force_no_tty();
    }

    let bold = |text: &str| Cell::new(text).add_attribute(Attribute::Bold);
    let entries = match payload {
        Value::Object(map) => {
            table.set_header(vec![bold("Field"), bold("Value")]);
            for (key, value) in map {
                table.add_row(vec![key.clone(), value_text(value)]);
            }
            map.len()
        }
        Value::Array(items) => {
            table.set_header(vec![bold("#"), bold("Value")]);
            for (index, value) in items.iter().enumerate() {
                table.add_row(vec![index.to_string(), value_text(value)]);
            }
            items.len()
        }
        scalar => {
            table.set_header(vec![bold("Value")]);
            table.add_row(vec![value_text(scalar)]);
            1
        }
    };

    if options.use_color {
        writeln!(out, "{}", TITLE.blue().bold())?;
    } else {
        writeln!(out, "{}", TITLE)?;
    }
    writeln!(out, "{table}")?;

    let summary = if entries == 1 {
        "1 entry".to_string()
    } else {
        format!("{} entries", entries)
    };
    if options.use_color {
        writeln!(out, "{}", summary.green())?;
    } else {
        writeln!(out, "{}", summary)?;
    }
    Ok(())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        nested => serde_json::to_string_pretty(nested).unwrap_or_else(|_| nested.to_string()),
    }
}

/// Human-readable error for a failed outcome, `None` on success
pub fn failure_message(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Success { .. } => None,
        Outcome::TransportFailure {
            exit_status,
            raw_output,
        } => {
            let mut msg = format!("API request failed with exit code {}", exit_status);
            if raw_output.trim().is_empty() {
                msg.push_str(". No output available");
            } else {
                match serde_json::from_str::<Value>(raw_output) {
                    Ok(response) => {
                        let pretty = serde_json::to_string_pretty(&response)
                            .unwrap_or_else(|_| raw_output.clone());
                        msg.push_str(&format!(". Response: {}", pretty));
                    }
                    Err(_) => msg.push_str(&format!(". Raw output: {}", raw_output.trim_end())),
                }
            }
            Some(msg)
        }
        Outcome::EmptyResponseFailure => Some("Empty response from API".to_string()),
        Outcome::DecodeFailure {
            raw_output,
            decode_error,
        } => Some(format!(
            "Failed to parse JSON response: {}. Raw response: {}",
            decode_error,
            raw_output.trim_end()
        )),
    }
}

/// Process exit code for an outcome
pub fn exit_code(outcome: &Outcome) -> i32 {
    if outcome.is_success() {
        0
    } else {
        1
    }
}
