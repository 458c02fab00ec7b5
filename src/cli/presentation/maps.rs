//! Map presentation: list and show in text, table and json.

use super::{to_pretty_json, value_cell};
use crate::entry::{ConfigMap, Entry, EntryValue};
use crate::error::ApiError;
use crate::map_set::MapLocation;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::{json, Map, Value};

pub fn format_map_list_text(maps: &[MapLocation]) -> String {
    if maps.is_empty() {
        return "No maps configured.\n\nAdd a [[maps]] entry to optmap.toml.".to_string();
    }
    let mut output = String::from("Config maps (lowest priority first):\n");
    for (i, map) in maps.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {:<20} {}\n",
            i + 1,
            map.id,
            map.path.display()
        ));
    }
    output.push_str(&format!("\nTotal: {} map(s)", maps.len()));
    output
}

pub fn format_map_list_json(maps: &[MapLocation]) -> Result<String, ApiError> {
    let list: Vec<Value> = maps
        .iter()
        .enumerate()
        .map(|(i, m)| {
            json!({
                "priority": i,
                "id": m.id,
                "path": m.path.display().to_string(),
            })
        })
        .collect();
    to_pretty_json(&json!({ "maps": list, "total": maps.len() }))
}

/// One row per top-level option.
pub fn format_map_table(map: &ConfigMap) -> String {
    if map.is_empty() {
        return "Map is empty.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Option", "Type", "Action", "Source", "Value"]);
    for (name, entry) in map {
        table.add_row(vec![
            name.clone(),
            entry.kind().to_string(),
            entry.action.to_string(),
            entry.source_map.clone().unwrap_or_else(|| "-".to_string()),
            value_cell(&entry.to_value()),
        ]);
    }
    table.to_string()
}

pub fn format_map_json(map: &ConfigMap) -> Result<String, ApiError> {
    let options: Map<String, Value> = map
        .iter()
        .map(|(name, entry)| (name.clone(), entry_json(entry)))
        .collect();
    to_pretty_json(&Value::Object(options))
}

fn entry_json(entry: &Entry) -> Value {
    let value = match &entry.value {
        EntryValue::Scalar(v) => v.clone(),
        EntryValue::Array(children) => Value::Object(
            children
                .iter()
                .map(|(k, child)| (k.clone(), entry_json(child)))
                .collect(),
        ),
    };
    let mut out = json!({
        "type": entry.kind().as_str(),
        "value": value,
        "action": entry.action.as_str(),
    });
    if let (Some(source), Value::Object(obj)) = (&entry.source_map, &mut out) {
        obj.insert("source".to_string(), Value::String(source.clone()));
    }
    out
}
