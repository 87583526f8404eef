//! Node schema catalog: fetches node-type contracts from the host and serves
//! them as an immutable snapshot.
//!
//! A refresh builds a complete new [`CatalogSnapshot`] and swaps it in with a
//! single pointer store. Readers hold an `Arc` to whichever snapshot was
//! current when they asked, so they never observe a half-applied refresh.

pub mod parse;
pub mod schema;
pub mod similarity;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub use schema::{InputKind, InputSpec, NodeTypeSchema, WILDCARD_TAG};

use crate::error::CatalogError;

const SCHEMA_PATH: &str = "/object_info";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Root URL of the host, e.g. `http://127.0.0.1:8188`.
    pub base_url: String,
    /// Upper bound on the whole schema request.
    pub timeout: Duration,
    /// A snapshot younger than this is reused by [`SchemaCatalog::refresh`].
    pub freshness_window: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8188".into(),
            timeout: Duration::from_secs(10),
            freshness_window: Duration::from_secs(300),
        }
    }
}

impl CatalogConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn schema_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SCHEMA_PATH)
    }
}

/// One complete, immutable view of the host's node types.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    schemas: HashMap<String, NodeTypeSchema>,
    fetched_at: Option<Instant>,
}

impl CatalogSnapshot {
    pub fn new(schemas: HashMap<String, NodeTypeSchema>) -> Self {
        Self {
            schemas,
            fetched_at: Some(Instant::now()),
        }
    }

    /// A snapshot with no fetch time, for targets without a monotonic clock
    /// (`wasm32-unknown-unknown`). Never counts as fresh.
    pub fn unstamped(schemas: HashMap<String, NodeTypeSchema>) -> Self {
        Self {
            schemas,
            fetched_at: None,
        }
    }

    /// Parse a raw schema payload into an unstamped snapshot.
    pub fn from_payload(payload: &Value) -> Result<Self, CatalogError> {
        parse::parse_payload(payload).map(Self::unstamped)
    }

    /// At least one node type is known.
    pub fn is_loaded(&self) -> bool {
        !self.schemas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    pub fn exists(&self, class_type: &str) -> bool {
        self.schemas.contains_key(class_type)
    }

    pub fn get(&self, class_type: &str) -> Option<&NodeTypeSchema> {
        self.schemas.get(class_type)
    }

    pub fn output_type_at(&self, class_type: &str, slot: usize) -> Option<&str> {
        self.schemas.get(class_type)?.output_type(slot)
    }

    /// Declared tag of an input and whether it is required.
    pub fn input_type(&self, class_type: &str, input_name: &str) -> Option<(&str, bool)> {
        let input = self.schemas.get(class_type)?.input(input_name)?;
        Some((input.kind.tag(), input.required))
    }

    pub fn suggest_similar(&self, class_type: &str, limit: usize) -> Vec<String> {
        similarity::close_matches(
            class_type,
            self.schemas.keys().map(String::as_str),
            limit,
            similarity::DEFAULT_CUTOFF,
        )
    }

    /// All known class types, sorted.
    pub fn class_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.keys().cloned().collect();
        names.sort();
        names
    }

    fn is_fresh(&self, window: Duration) -> bool {
        self.fetched_at
            .is_some_and(|fetched| fetched.elapsed() < window)
    }
}

/// Cached, refreshable catalog of node-type contracts for one host.
pub struct SchemaCatalog {
    config: CatalogConfig,
    client: reqwest::Client,
    snapshot: ArcSwap<CatalogSnapshot>,
    refresh_lock: Mutex<()>,
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

impl SchemaCatalog {
    /// An empty catalog; nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            snapshot: ArcSwap::from_pointee(CatalogSnapshot::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The current snapshot. Stays valid and unchanged across later refreshes.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.load_full()
    }

    /// Fetch the schema payload unless the current snapshot is still fresh.
    /// On failure the previous snapshot is kept and `false` is returned.
    pub async fn refresh(&self) -> bool {
        let _guard = self.refresh_lock.lock().await;
        if self.snapshot.load().is_fresh(self.config.freshness_window) {
            debug!("schema catalog is fresh, skipping fetch");
            return true;
        }
        self.fetch_and_install().await
    }

    /// Fetch regardless of snapshot age.
    pub async fn force_refresh(&self) -> bool {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_and_install().await
    }

    /// Install a payload obtained some other way (saved file, test fixture).
    /// Returns the number of node types loaded.
    pub fn load_payload(&self, payload: &Value) -> Result<usize, CatalogError> {
        let schemas = parse::parse_payload(payload)?;
        let count = schemas.len();
        self.snapshot.store(Arc::new(CatalogSnapshot::new(schemas)));
        Ok(count)
    }

    async fn fetch_and_install(&self) -> bool {
        let url = self.config.schema_url();
        debug!(url = %url, "fetching node schemas");
        match self.fetch(&url).await {
            Ok(schemas) => {
                info!(url = %url, node_types = schemas.len(), "schema catalog refreshed");
                self.snapshot.store(Arc::new(CatalogSnapshot::new(schemas)));
                true
            }
            Err(e) => {
                warn!(url = %url, error = %e, "schema catalog refresh failed, keeping previous snapshot");
                false
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<HashMap<String, NodeTypeSchema>, CatalogError> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(CatalogError::Status(response.status().as_u16()));
        }
        let payload: Value = response.json().await?;
        parse::parse_payload(&payload)
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.load().is_loaded()
    }

    pub fn last_refreshed(&self) -> Option<Instant> {
        self.snapshot.load().fetched_at()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    pub fn exists(&self, class_type: &str) -> bool {
        self.snapshot.load().exists(class_type)
    }

    pub fn get(&self, class_type: &str) -> Option<NodeTypeSchema> {
        self.snapshot.load().get(class_type).cloned()
    }

    pub fn output_type_at(&self, class_type: &str, slot: usize) -> Option<String> {
        self.snapshot
            .load()
            .output_type_at(class_type, slot)
            .map(str::to_string)
    }

    pub fn input_type(&self, class_type: &str, input_name: &str) -> Option<(String, bool)> {
        self.snapshot
            .load()
            .input_type(class_type, input_name)
            .map(|(tag, required)| (tag.to_string(), required))
    }

    /// Known class types resembling `class_type`, best first; empty when
    /// nothing is close enough to be useful.
    pub fn suggest_similar(&self, class_type: &str, limit: usize) -> Vec<String> {
        self.snapshot.load().suggest_similar(class_type, limit)
    }

    pub fn class_types(&self) -> Vec<String> {
        self.snapshot.load().class_types()
    }
}
