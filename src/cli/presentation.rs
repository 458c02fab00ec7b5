//! CLI presentation: text, table and json formatters per command family.

mod changes;
mod maps;
mod store;

pub use changes::{format_reconcile_json, format_reconcile_text, format_refresh_text};
pub use maps::{format_map_json, format_map_list_json, format_map_list_text, format_map_table};
pub use store::{format_store_list_json, format_store_list_text};

use crate::error::ApiError;

fn to_pretty_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::RenderError(e.to_string()))
}

/// Compact one-line JSON rendering of a value for tables.
fn value_cell(value: &serde_json::Value) -> String {
    value.to_string()
}
