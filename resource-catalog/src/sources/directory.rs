use crate::traits::DataSource;
use crate::types::{CatalogError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Static catalog files under a local directory.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(CatalogError::General(format!(
                "Refusing to read {:?} outside the data directory",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DataSource for DirectorySource {
    fn source_name(&self) -> String {
        format!("directory {}", self.root.display())
    }

    async fn fetch_json(&self, path: &str) -> Result<Value> {
        let full_path = self.resolve(path)?;
        debug!("Reading {}", full_path.display());

        let content = tokio::fs::read_to_string(&full_path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
