//! Store presentation: raw option listing.

use super::{to_pretty_json, value_cell};
use crate::error::ApiError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::{Map, Value};

pub fn format_store_list_text(options: &[(String, Value)]) -> String {
    if options.is_empty() {
        return "Option store is empty.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Option", "Value"]);
    for (name, value) in options {
        table.add_row(vec![name.clone(), value_cell(value)]);
    }
    format!("{}\n\nTotal: {} option(s)", table, options.len())
}

pub fn format_store_list_json(options: &[(String, Value)]) -> Result<String, ApiError> {
    let obj: Map<String, Value> = options.iter().cloned().collect();
    to_pretty_json(&Value::Object(obj))
}
