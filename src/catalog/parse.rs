//! Schema endpoint payload → [`NodeTypeSchema`] entries.
//!
//! The payload is loosely typed, so each entry is read leniently: fields with
//! an unexpected shape fall back to their defaults instead of failing the
//! whole refresh. Only a payload that is not a mapping, or an entry that is
//! not a record, is rejected.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use super::schema::{CHOICE_TAG, InputKind, InputSpec, NodeTypeSchema};
use crate::error::CatalogError;

const UNKNOWN_TAG: &str = "UNKNOWN";

/// Parse a whole payload into a fresh schema map.
pub fn parse_payload(payload: &Value) -> Result<HashMap<String, NodeTypeSchema>, CatalogError> {
    let entries = payload
        .as_object()
        .ok_or_else(|| CatalogError::Malformed("payload is not a JSON object".into()))?;

    let mut schemas = HashMap::with_capacity(entries.len());
    for (class_type, info) in entries {
        let info = info.as_object().ok_or_else(|| {
            CatalogError::Malformed(format!("entry '{}' is not a JSON object", class_type))
        })?;
        schemas.insert(class_type.clone(), parse_entry(class_type, info));
    }
    Ok(schemas)
}

/// Parse one raw entry.
pub fn parse_entry(class_type: &str, info: &Map<String, Value>) -> NodeTypeSchema {
    let text = |key: &str| info.get(key).and_then(Value::as_str).map(str::to_string);

    let output_types = info
        .get("output")
        .and_then(Value::as_array)
        .map(|outputs| outputs.iter().map(output_tag).collect())
        .unwrap_or_default();

    let output_names = info
        .get("output_name")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let sections = info.get("input").and_then(Value::as_object);
    let section = |name: &str, required: bool| -> BTreeMap<String, InputSpec> {
        sections
            .and_then(|s| s.get(name))
            .and_then(Value::as_object)
            .map(|inputs| {
                inputs
                    .iter()
                    .map(|(input_name, spec)| {
                        (input_name.clone(), parse_input(input_name, spec, required))
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    NodeTypeSchema {
        class_type: class_type.to_string(),
        category: text("category").unwrap_or_default(),
        display_name: text("display_name").unwrap_or_else(|| class_type.to_string()),
        description: text("description").unwrap_or_default(),
        required_inputs: section("required", true),
        optional_inputs: section("optional", false),
        output_types,
        output_names,
    }
}

/// Parse a `[typeInfo, constraints?]` pair. `required` comes from the section
/// the input was declared under.
pub fn parse_input(name: &str, spec: &Value, required: bool) -> InputSpec {
    let mut input = InputSpec {
        name: name.to_string(),
        kind: InputKind::Reference(UNKNOWN_TAG.to_string()),
        required,
        default: None,
        min: None,
        max: None,
    };

    let Some(parts) = spec.as_array().filter(|p| !p.is_empty()) else {
        return input;
    };
    let constraints = parts.get(1).and_then(Value::as_object);

    input.kind = match &parts[0] {
        Value::String(tag) if tag == CHOICE_TAG => {
            match constraints.and_then(|c| c.get("options")).and_then(Value::as_array) {
                Some(options) => InputKind::Choice(options.iter().map(option_text).collect()),
                None => InputKind::Reference(CHOICE_TAG.to_string()),
            }
        }
        Value::String(tag) => InputKind::from_tag(tag),
        Value::Array(options) => InputKind::Choice(options.iter().map(option_text).collect()),
        _ => InputKind::Reference(UNKNOWN_TAG.to_string()),
    };

    if let Some(constraints) = constraints {
        input.default = constraints.get("default").cloned();
        if input.kind.is_numeric() {
            input.min = constraints.get("min").and_then(Value::as_f64);
            input.max = constraints.get("max").and_then(Value::as_f64);
        }
    }

    input
}

fn output_tag(output: &Value) -> String {
    match output {
        Value::String(tag) => tag.clone(),
        Value::Array(_) => CHOICE_TAG.to_string(),
        other => other.to_string(),
    }
}

fn option_text(option: &Value) -> String {
    match option {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
