//! WASM entry points for browser use.
//!
//! The browser already holds the host's schema payload, so these take it as
//! JSON instead of fetching it.

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::catalog::CatalogSnapshot;
use crate::graph::{GraphModel, extract};
use crate::validate::{self, ValidationReport};

/// Validate a workflow JSON against a schema payload JSON.
/// Returns a `ValidateResult` object.
#[wasm_bindgen]
pub fn validate_workflow(workflow_json: &str, catalog_json: &str) -> JsValue {
    to_js(&validate_workflow_inner(workflow_json, catalog_json))
}

/// Plain JS objects rather than `Map`s, so callers can read fields directly.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ValidateResult {
    Checked {
        valid: bool,
        report: ValidationReport,
        feedback: String,
    },
    InputError {
        message: String,
    },
}

pub fn validate_workflow_inner(workflow_json: &str, catalog_json: &str) -> ValidateResult {
    let graph = match GraphModel::parse(workflow_json) {
        Ok(g) => g,
        Err(e) => {
            return ValidateResult::InputError {
                message: e.to_string(),
            };
        }
    };

    // An unreadable payload leaves the catalog empty: structural checks only.
    let catalog = serde_json::from_str::<Value>(catalog_json)
        .ok()
        .and_then(|payload| CatalogSnapshot::from_payload(&payload).ok())
        .unwrap_or_default();

    let report = validate::validate_snapshot(&graph, &catalog);
    ValidateResult::Checked {
        valid: report.is_valid(),
        feedback: report.render_for_agent(),
        report,
    }
}

/// Pull a workflow out of free text. Returns the workflow object or `null`.
#[wasm_bindgen]
pub fn extract_workflow(text: &str) -> JsValue {
    match extract_workflow_inner(text) {
        Some(json) => to_js(&json),
        None => JsValue::NULL,
    }
}

pub fn extract_workflow_inner(text: &str) -> Option<Value> {
    let graph = extract::extract(text)?;
    serde_json::to_value(&graph).ok()
}
