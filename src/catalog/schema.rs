//! Node-type contracts as published by the host.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Tag that is compatible with every other tag.
pub const WILDCARD_TAG: &str = "*";

/// Tag the host uses for enumerated-choice inputs and outputs.
pub const CHOICE_TAG: &str = "COMBO";

/// Primitive tags the host understands natively.
pub const PRIMITIVE_TAGS: &[&str] = &["INT", "FLOAT", "STRING", "BOOLEAN"];

/// What an input accepts. Decided once when the payload is parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum InputKind {
    /// `INT`, `FLOAT`, `STRING` or `BOOLEAN`.
    Primitive(String),
    /// Opaque handle type such as `MODEL`, `IMAGE` or `LATENT`.
    Reference(String),
    Wildcard,
    /// Finite set of string options.
    Choice(Vec<String>),
}

impl InputKind {
    /// Classify a single type name from the payload.
    pub fn from_tag(tag: &str) -> Self {
        if tag == WILDCARD_TAG {
            InputKind::Wildcard
        } else if PRIMITIVE_TAGS.contains(&tag) {
            InputKind::Primitive(tag.to_string())
        } else {
            InputKind::Reference(tag.to_string())
        }
    }

    /// The host tag for this kind, as used in type-compatibility checks.
    pub fn tag(&self) -> &str {
        match self {
            InputKind::Primitive(t) | InputKind::Reference(t) => t,
            InputKind::Wildcard => WILDCARD_TAG,
            InputKind::Choice(_) => CHOICE_TAG,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, InputKind::Primitive(t) if t == "INT" || t == "FLOAT")
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, InputKind::Wildcard)
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            InputKind::Choice(options) => Some(options),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSpec {
    pub name: String,
    pub kind: InputKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Only populated for numeric kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeSchema {
    pub class_type: String,
    pub category: String,
    pub display_name: String,
    pub description: String,
    pub required_inputs: BTreeMap<String, InputSpec>,
    pub optional_inputs: BTreeMap<String, InputSpec>,
    /// Slot `i` produces `output_types[i]`.
    pub output_types: Vec<String>,
    pub output_names: Vec<String>,
}

impl NodeTypeSchema {
    /// Required section first, then optional.
    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.required_inputs
            .get(name)
            .or_else(|| self.optional_inputs.get(name))
    }

    pub fn output_type(&self, slot: usize) -> Option<&str> {
        self.output_types.get(slot).map(String::as_str)
    }

    pub fn output_count(&self) -> usize {
        self.output_types.len()
    }
}
