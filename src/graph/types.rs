//! Workflow types in the host's API wire format.
//!
//! ```json
//! { "3": { "class_type": "KSampler",
//!          "inputs": { "seed": 5, "model": ["4", 0] },
//!          "_meta": { "title": "KSampler" } } }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Node ids are strings; freshly allocated ids are decimal integers.
pub type NodeId = String;

/// Input name → value, in declaration order.
pub type Inputs = IndexMap<String, InputValue>;

/// Back-reference to output `slot` of node `source`. May dangle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: NodeId,
    pub slot: usize,
}

impl Link {
    pub fn new(source: impl Into<NodeId>, slot: usize) -> Self {
        Link {
            source: source.into(),
            slot,
        }
    }
}

/// An input is either wired to another node's output or holds a literal.
///
/// On the wire a link is a two-element array `[sourceId, slot]`. Any JSON
/// value of that shape is read as a link; everything else is a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Link(Link),
    Literal(Value),
}

impl InputValue {
    pub fn link(source: impl Into<NodeId>, slot: usize) -> Self {
        InputValue::Link(Link::new(source, slot))
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            InputValue::Link(link) => Some(link),
            InputValue::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            InputValue::Literal(value) => Some(value),
            InputValue::Link(_) => None,
        }
    }

    /// Re-read a literal the way the wire format would, so a link-shaped
    /// literal becomes a [`Link`]. Keeps `to_text`/`from_text` lossless.
    pub fn normalized(self) -> Self {
        match self {
            InputValue::Literal(value) => InputValue::from(value),
            link @ InputValue::Link(_) => link,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, InputValue::Link(_))
    }

    fn to_value(&self) -> Value {
        match self {
            InputValue::Link(link) => Value::Array(vec![
                Value::String(link.source.clone()),
                Value::from(link.slot),
            ]),
            InputValue::Literal(value) => value.clone(),
        }
    }
}

impl From<Value> for InputValue {
    fn from(value: Value) -> Self {
        if let Value::Array(items) = &value {
            if let [source, slot] = items.as_slice() {
                let source = match source {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) if n.is_u64() => Some(n.to_string()),
                    _ => None,
                };
                let slot = slot.as_u64().and_then(|s| usize::try_from(s).ok());
                if let (Some(source), Some(slot)) = (source, slot) {
                    return InputValue::Link(Link { source, slot });
                }
            }
        }
        InputValue::Literal(value)
    }
}

impl From<Link> for InputValue {
    fn from(link: Link) -> Self {
        InputValue::Link(link)
    }
}

impl Serialize for InputValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InputValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(InputValue::from)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One node of a workflow.
///
/// `class_type` and `inputs` are optional so that records missing them can
/// still be loaded and reported by the structural checks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Inputs>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<NodeMeta>,
    /// Keys this crate does not interpret, kept for the round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeInstance {
    pub fn new(class_type: impl Into<String>, inputs: Inputs, title: Option<String>) -> Self {
        NodeInstance {
            class_type: Some(class_type.into()),
            inputs: Some(inputs),
            meta: Some(NodeMeta { title }),
            extra: Map::new(),
        }
    }

    /// Class type, treating an empty string as absent.
    pub fn class_type(&self) -> Option<&str> {
        self.class_type.as_deref().filter(|c| !c.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.as_ref()?.title.as_deref()
    }

    pub fn input(&self, name: &str) -> Option<&InputValue> {
        self.inputs.as_ref()?.get(name)
    }

    /// All inputs; empty when the record has no inputs map.
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.inputs
            .iter()
            .flat_map(|inputs| inputs.iter())
            .map(|(name, value)| (name.as_str(), value))
    }

    /// `(input name, link)` for every linked input.
    pub fn links(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.inputs()
            .filter_map(|(name, value)| value.as_link().map(|link| (name, link)))
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut Inputs {
        self.inputs.get_or_insert_with(Inputs::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn two_element_arrays_become_links() {
        assert_eq!(InputValue::from(json!(["4", 1])), InputValue::link("4", 1));
        assert_eq!(InputValue::from(json!([4, 0])), InputValue::link("4", 0));
    }

    #[test]
    fn other_values_stay_literal() {
        for value in [json!(5), json!("text"), json!(["a", "b"]), json!([1, 2, 3]), json!(["a", -1])] {
            assert_eq!(InputValue::from(value.clone()), InputValue::Literal(value));
        }
    }

    #[test]
    fn node_record_keeps_unknown_keys() {
        let raw = json!({"class_type": "Blur", "inputs": {}, "is_changed": ["x"]});
        let node: NodeInstance = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node.extra.get("is_changed"), Some(&json!(["x"])));
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn missing_fields_parse_as_none() {
        let node: NodeInstance = serde_json::from_value(json!({"_meta": {"title": "t"}})).unwrap();
        assert_eq!(node.class_type(), None);
        assert!(node.inputs.is_none());
        assert_eq!(node.title(), Some("t"));
        assert_eq!(node.inputs().count(), 0);
    }
}
