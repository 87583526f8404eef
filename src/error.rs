//! Error types for the few operations that can fail outright.
//!
//! Validation findings are never errors; they travel as [`crate::diagnostic::Issue`]
//! records inside a report.

use thiserror::Error;

/// Failure while fetching or decoding a node schema payload.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("schema request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("schema endpoint answered with HTTP {0}")]
    Status(u16),

    #[error("malformed schema payload: {0}")]
    Malformed(String),
}

/// Failure while loading a workflow from text.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to parse workflow JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("text is valid JSON but not a mapping of node ids to node records")]
    NotAWorkflow,
}
