pub mod directory;
pub mod http;

pub use directory::DirectorySource;
pub use http::HttpSource;

use crate::traits::DataSource;
use crate::types::{CatalogConfig, DataLocation, Result};
use std::sync::Arc;

/// Builds the source matching the configured data location.
pub fn from_config(config: &CatalogConfig) -> Result<Arc<dyn DataSource>> {
    Ok(match &config.data {
        DataLocation::Directory(root) => Arc::new(DirectorySource::new(root.clone())),
        DataLocation::Url(base_url) => Arc::new(HttpSource::new(base_url, config.fetch.clone())?),
    })
}
