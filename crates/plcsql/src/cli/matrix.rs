//! Matrix command implementation

use super::output::{self, OutputFormat};
use anyhow::Result;
use plcsql_types::{CoercionMatrix, routine_name};
use serde_json::{Value, json};

/// Configuration for matrix command
pub struct MatrixConfig {
    pub format: OutputFormat,
}

pub fn matrix_json(matrix: &CoercionMatrix) -> Value {
    let entries: Vec<Value> = matrix
        .entries()
        .map(|(from, to)| {
            json!({
                "from": from.pcs_name(),
                "to": to.pcs_name(),
                "routine": routine_name(from, to),
            })
        })
        .collect();
    Value::Array(entries)
}

/// One line per entry, grouped by source type
pub fn matrix_text(matrix: &CoercionMatrix) -> String {
    let mut lines = Vec::with_capacity(matrix.len());
    for (from, to) in matrix.entries() {
        lines.push(format!(
            "{:<10} -> {:<10} {}",
            from.pcs_name(),
            to.pcs_name(),
            routine_name(from, to)
        ));
    }
    lines.join("\n")
}

/// Print the coercion matrix
pub fn matrix(config: MatrixConfig) -> Result<()> {
    let matrix = CoercionMatrix::global();
    let content = match config.format {
        OutputFormat::Text => format!(
            "{}\n{}",
            output::format_heading(&format!("{} conversion(s)", matrix.len())),
            matrix_text(matrix)
        ),
        OutputFormat::Json => output::format_json(&matrix_json(matrix))?,
    };
    println!("{}", content);
    Ok(())
}
