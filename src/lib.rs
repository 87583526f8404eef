pub mod catalog;
pub mod diagnostic;
pub mod error;
pub mod graph;
pub mod validate;
pub mod wasm;

pub use catalog::{CatalogConfig, CatalogSnapshot, SchemaCatalog};
pub use diagnostic::{Check, Issue, Severity};
pub use error::{CatalogError, GraphError};
pub use graph::extract::extract;
pub use graph::{GraphModel, InputValue, Link, NodeId, NodeInstance};
pub use validate::{ValidationReport, validate, validate_snapshot};
