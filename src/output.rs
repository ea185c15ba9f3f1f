// ABOUTME: Output formatting for CLI feedback and record views.
// ABOUTME: Supports normal (tables), quiet (tab-separated), and JSON lines output modes.

use serde::Serialize;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with headers and aligned columns
    Normal,
    /// Minimal output for scripts (values only)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Print a section heading (normal mode only).
    pub fn heading(&self, title: &str) {
        if self.mode == OutputMode::Normal {
            println!("{title}");
        }
    }

    /// Print a list of records.
    ///
    /// `rows` must be in the same order as `records`; JSON mode prints the
    /// records themselves, one per line.
    pub fn table<T: Serialize>(&self, headers: &[&str], rows: &[Vec<String>], records: &[T]) {
        match self.mode {
            OutputMode::Normal => print!("{}", render_table(headers, rows)),
            OutputMode::Quiet => {
                for row in rows {
                    println!("{}", row.join("\t"));
                }
            }
            OutputMode::Json => {
                for record in records {
                    print_json(record);
                }
            }
        }
    }

    /// Print labelled values for a single record.
    pub fn fields<T: Serialize>(&self, fields: &[(&str, String)], record: &T) {
        match self.mode {
            OutputMode::Normal => {
                let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
                for (label, value) in fields {
                    println!("  {label:<width$}  {value}");
                }
            }
            OutputMode::Quiet => {
                for (_, value) in fields {
                    println!("{value}");
                }
            }
            OutputMode::Json => print_json(record),
        }
    }

    /// Print a success message.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "success",
                    message,
                };
                print_json(&event);
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!("failed to serialize output: {}", e),
    }
}

/// Left-aligned columns separated by three spaces, header first.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for line in std::iter::once(&header).chain(rows) {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        out.push_str(cells.join("   ").trim_end());
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
}
