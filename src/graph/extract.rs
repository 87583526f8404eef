//! Best-effort recovery of a workflow from free text, such as a chat reply.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::GraphModel;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("static pattern"));
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").expect("static pattern"));

/// Find the first workflow in `text`. Candidates are tried in order:
/// ```` ```json ```` blocks, any fenced block, then the whole text.
pub fn extract(text: &str) -> Option<GraphModel> {
    let fenced = [&*JSON_FENCE, &*ANY_FENCE]
        .into_iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));

    let found = fenced
        .chain(std::iter::once(text))
        .find_map(|candidate| {
            looks_like_workflow(candidate)
                .then(|| GraphModel::parse(candidate).ok())
                .flatten()
        });

    match &found {
        Some(graph) => debug!(nodes = graph.len(), "extracted workflow from text"),
        None => debug!("no workflow found in text"),
    }
    found
}

/// A JSON object with at least one record value carrying `class_type`.
fn looks_like_workflow(candidate: &str) -> bool {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => map
            .values()
            .any(|v| v.as_object().is_some_and(|node| node.contains_key("class_type"))),
        _ => false,
    }
}
