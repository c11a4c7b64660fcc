//! Turns raw model replies into candidate [`ToolRecord`]s
//!
//! Replies are expected to hold a JSON array (or a single object), possibly
//! wrapped in a fenced code block. Anything unparseable degrades to an empty
//! list with a warning; parsing never fails.

use super::record::ToolRecord;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

const FENCE: &str = "```";
const MODELLED_KEYS: [&str; 5] = ["name", "description", "url", "category", "tags"];

/// Removes a surrounding fenced code block, language tag included
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed;
    }

    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => "",
    };

    let body = body.trim_end();
    match body.rfind('\n') {
        Some(last_newline) if body[last_newline + 1..].trim_start().starts_with(FENCE) => {
            body[..last_newline].trim()
        }
        None if body.trim_start().starts_with(FENCE) => "",
        _ => body.trim(),
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn record_from_object(object: &Map<String, Value>) -> Option<ToolRecord> {
    if !object.contains_key("name") {
        return None;
    }

    let tags = match object.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Default::default(),
    };

    let extra = object
        .iter()
        .filter(|(key, _)| !MODELLED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(ToolRecord {
        name: string_field(object, "name"),
        description: string_field(object, "description"),
        url: string_field(object, "url"),
        category: string_field(object, "category"),
        tags,
        extra,
    })
}

/// Parses a model reply into candidate records
pub fn parse_tools(text: &str) -> Vec<ToolRecord> {
    let body = strip_code_fence(text);

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse model reply as JSON: {}", e);
            debug!(
                "Reply head: {}",
                text.chars().take(500).collect::<String>()
            );
            return Vec::new();
        }
    };

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            warn!(
                "Model reply is JSON but neither an array nor an object: {}",
                json_kind(&other)
            );
            return Vec::new();
        }
    };

    let total = items.len();
    let tools: Vec<ToolRecord> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(record_from_object)
        .collect();

    if tools.len() < total {
        debug!("Skipped {} element(s) without a name", total - tools.len());
    }
    info!("Parsed {} tool(s) from model reply", tools.len());
    tools
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
