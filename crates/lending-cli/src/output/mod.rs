pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Row-shaped fields of a result, in the order they are rendered.
pub(crate) const ROW_FIELDS: [&str; 4] = ["periods", "entries", "previews", "records"];

/// The first row-shaped array (of objects) inside a result object.
pub(crate) fn row_array(result: &serde_json::Map<String, Value>) -> Option<(&str, &Vec<Value>)> {
    ROW_FIELDS.iter().find_map(|key| match result.get(*key) {
        Some(Value::Array(rows)) if rows.iter().all(Value::is_object) => Some((*key, rows)),
        _ => None,
    })
}
