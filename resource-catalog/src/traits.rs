use crate::types::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for reading catalog JSON documents from wherever the static data is
/// published (a local directory, a web server, ...).
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable description of this source, for logs
    fn source_name(&self) -> String;

    /// Fetch and parse the JSON document at `path`, relative to the data root
    /// (e.g. `index.json`, `universities/msu/olympiads.json`).
    async fn fetch_json(&self, path: &str) -> Result<Value>;
}
