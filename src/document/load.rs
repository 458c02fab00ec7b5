//! Map loader: document text -> [`ConfigMap`].

use crate::entry::{ApplyAction, ConfigMap, Entry, EntryKind, EntryValue};
use crate::error::ApiError;
use indexmap::IndexMap;
use serde_json::Value;
use serde_yaml::{Mapping, Value as Yaml};
use std::path::Path;
use tracing::debug;

/// Load the map document at `path`.
pub fn load(path: &Path) -> Result<ConfigMap, ApiError> {
    let text = std::fs::read_to_string(path).map_err(|e| ApiError::load(path, e))?;
    let map = parse(&text, path)?;
    debug!(path = %path.display(), options = map.len(), "Loaded config map");
    Ok(map)
}

/// Parse document text. `path` is only used in error messages.
pub fn parse(text: &str, path: &Path) -> Result<ConfigMap, ApiError> {
    let doc: Yaml = serde_yaml::from_str(text).map_err(|e| ApiError::load(path, e))?;
    let Yaml::Mapping(mapping) = doc else {
        return Err(ApiError::load(
            path,
            "document must be a mapping of option specs",
        ));
    };
    let entries = parse_entries(&mapping, "").map_err(|reason| ApiError::load(path, reason))?;
    Ok(ConfigMap::from(entries))
}

fn parse_entries(mapping: &Mapping, prefix: &str) -> Result<IndexMap<String, Entry>, String> {
    let mut entries = IndexMap::with_capacity(mapping.len());
    for (key, spec) in mapping {
        let name = key_to_string(key)
            .ok_or_else(|| format!("{}: option names must be strings or numbers", display(prefix)))?;
        let location = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        if entries.contains_key(&name) {
            return Err(format!("{}: duplicate option name", location));
        }
        let entry = parse_entry(spec, &location)?;
        entries.insert(name, entry);
    }
    Ok(entries)
}

fn parse_entry(spec: &Yaml, location: &str) -> Result<Entry, String> {
    let Yaml::Mapping(fields) = spec else {
        return Err(format!("{}: option spec must be a mapping", location));
    };

    let mut kind = None;
    let mut raw_value = None;
    let mut action = None;
    let mut source_map = None;

    for (field, value) in fields {
        let field = field.as_str().unwrap_or_default();
        match field {
            "type" => {
                let tag = value
                    .as_str()
                    .ok_or_else(|| format!("{}: type must be a string", location))?;
                kind = Some(
                    EntryKind::parse(tag)
                        .ok_or_else(|| format!("{}: unknown type '{}'", location, tag))?,
                );
            }
            "value" => raw_value = Some(value),
            "action" => {
                let name = value
                    .as_str()
                    .ok_or_else(|| format!("{}: action must be a string", location))?;
                action = Some(
                    ApplyAction::parse(name)
                        .ok_or_else(|| format!("{}: unknown action '{}'", location, name))?,
                );
            }
            "source" => match value {
                Yaml::Null => {}
                Yaml::String(id) => source_map = Some(id.clone()),
                _ => return Err(format!("{}: source must be a string", location)),
            },
            other => return Err(format!("{}: unknown key '{}'", location, other)),
        }
    }

    let kind = kind.ok_or_else(|| format!("{}: missing type", location))?;
    let raw_value = raw_value.ok_or_else(|| format!("{}: missing value", location))?;
    let action = action.ok_or_else(|| format!("{}: missing action", location))?;

    let value = match kind {
        EntryKind::Scalar => EntryValue::Scalar(scalar_value(raw_value, location)?),
        EntryKind::Array => match raw_value {
            Yaml::Mapping(children) => EntryValue::Array(parse_entries(children, location)?),
            _ => {
                return Err(format!(
                    "{}: array value must be a mapping of option specs",
                    location
                ))
            }
        },
    };

    Ok(Entry {
        value,
        action,
        source_map,
    })
}

fn scalar_value(value: &Yaml, location: &str) -> Result<Value, String> {
    match value {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("{}: number {} is not finite", location, n))
            }
        }
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(format!(
            "{}: scalar value cannot be a nested structure",
            location
        )),
        Yaml::Tagged(_) => Err(format!("{}: tagged values are not supported", location)),
    }
}

fn key_to_string(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn display(prefix: &str) -> &str {
    if prefix.is_empty() {
        "<root>"
    } else {
        prefix
    }
}
