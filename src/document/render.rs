//! Map serializer: [`ConfigMap`] -> re-loadable document text.

use crate::entry::{ConfigMap, Entry, EntryValue};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value;

const INDENT: usize = 2;

/// Header comment for a document produced by `operation` at `at`.
pub fn header_line(operation: &str, at: DateTime<Utc>) -> String {
    format!(
        "Generated by optmap {} at {}",
        operation,
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Render `map` as document text with `header` as its first (comment) line.
pub fn render(map: &ConfigMap, header: &str) -> String {
    let header: String = header
        .chars()
        .map(|c| if is_printable(c) && !matches!(c, '\r' | '\n' | '\u{feff}') { c } else { ' ' })
        .collect();
    let mut out = format!("# {}\n", header.trim_end());

    if map.is_empty() {
        out.push_str("{}\n");
    } else {
        render_entries(&mut out, map.entries(), 0);
    }
    out
}

fn render_entries(out: &mut String, entries: &IndexMap<String, Entry>, depth: usize) {
    let pad = " ".repeat(depth);
    let inner = " ".repeat(depth + INDENT);

    for (name, entry) in entries {
        out.push_str(&format!("{}{}:\n", pad, quote(name)));
        out.push_str(&format!("{}type: {}\n", inner, entry.kind()));
        match &entry.value {
            EntryValue::Scalar(value) => {
                out.push_str(&format!("{}value: {}\n", inner, scalar_literal(value)));
            }
            EntryValue::Array(children) if children.is_empty() => {
                out.push_str(&format!("{}value: {{}}\n", inner));
            }
            EntryValue::Array(children) => {
                out.push_str(&format!("{}value:\n", inner));
                render_entries(out, children, depth + 2 * INDENT);
            }
        }
        out.push_str(&format!("{}action: {}\n", inner, entry.action));
        if let Some(source) = &entry.source_map {
            out.push_str(&format!("{}source: {}\n", inner, quote(source)));
        }
    }
}

/// Narrowest literal that loads back to exactly `value`.
fn scalar_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => float_literal(f),
            _ => n.to_string(),
        },
        Value::String(s) => quote(s),
        // Structured values never reach a scalar entry; emit flow JSON, which is valid YAML.
        other => other.to_string(),
    }
}

/// Debug formatting is the shortest round-trip form; make sure it still reads as a float.
fn float_literal(f: f64) -> String {
    let text = format!("{:?}", f);
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Characters YAML allows unescaped in a document (its `c-printable` set).
fn is_printable(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{7e}'
        | '\u{85}'
        | '\u{a0}'..='\u{d7ff}'
        | '\u{e000}'..='\u{fffd}'
        | '\u{10000}'..='\u{10ffff}')
}

/// Double-quoted YAML scalar. Anything outside the printable set, plus line
/// separators and the byte order mark, is written as a `\u` escape.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{feff}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c if !is_printable(c) => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
