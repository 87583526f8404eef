//! Editing operations. None of them consult a catalog; wiring mistakes are
//! left for the validator to report.

use super::{GraphModel, InputValue, Inputs, Link, NodeId, NodeInstance};

impl GraphModel {
    /// Insert a node under a fresh id and return the id. Inputs are stored
    /// as given, except that link-shaped literals are read as links. The
    /// title defaults to the class type.
    pub fn add_node(
        &mut self,
        class_type: impl Into<String>,
        inputs: Inputs,
        title: Option<&str>,
    ) -> NodeId {
        let class_type = class_type.into();
        let title = title.map(str::to_string).unwrap_or_else(|| class_type.clone());
        let inputs = inputs
            .into_iter()
            .map(|(name, value)| (name, value.normalized()))
            .collect();
        let id = self.next_id();
        self.nodes
            .insert(id.clone(), NodeInstance::new(class_type, inputs, Some(title)));
        id
    }

    /// Delete a node and drop every input that linked to it. Returns `false`
    /// if the node did not exist.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if self.nodes.shift_remove(id).is_none() {
            return false;
        }
        for node in self.nodes.values_mut() {
            if let Some(inputs) = node.inputs.as_mut() {
                inputs.retain(|_, value| value.as_link().is_none_or(|link| link.source != id));
            }
        }
        true
    }

    /// Wire `source_id[source_slot]` into `target_id.target_input`,
    /// replacing whatever the input held. Fails only when the target is
    /// absent.
    pub fn connect_nodes(
        &mut self,
        source_id: &str,
        source_slot: usize,
        target_id: &str,
        target_input: &str,
    ) -> bool {
        let Some(target) = self.nodes.get_mut(target_id) else {
            return false;
        };
        target
            .inputs_mut()
            .insert(target_input.to_string(), Link::new(source_id, source_slot).into());
        true
    }

    /// Set an input to a literal or a link. A link-shaped literal is stored
    /// as a link. Fails only when the node is absent.
    pub fn modify_input(&mut self, id: &str, input: &str, value: impl Into<InputValue>) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let value: InputValue = value.into();
        node.inputs_mut().insert(input.to_string(), value.normalized());
        true
    }

    /// Ids of all nodes of `class_type`, in insertion order.
    pub fn nodes_of_type(&self, class_type: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.class_type.as_deref() == Some(class_type))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// One past the largest all-digit id, or `"1"` if there is none.
    /// Ids with any non-digit character are ignored. Counting is done on the
    /// decimal text, so there is no upper bound and the result is always
    /// larger than every numeric id already present.
    pub fn next_id(&self) -> NodeId {
        self.nodes
            .keys()
            .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
            .map(|id| id.trim_start_matches('0'))
            .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map_or_else(|| "1".to_string(), increment_decimal)
    }
}

/// `digits + 1` for a string of ASCII digits without leading zeros.
/// The empty string counts as zero.
fn increment_decimal(digits: &str) -> String {
    let mut out: Vec<u8> = digits.bytes().collect();
    for d in out.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return out.into_iter().map(char::from).collect();
        }
    }
    out.insert(0, b'1');
    out.into_iter().map(char::from).collect()
}
