use crate::types::{ResourceBundle, ResourceRecord, ResourceType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Session cache for loaded data. Entries are never evicted or invalidated.
#[derive(Clone, Default)]
pub struct ResourceCache {
    bundles: Arc<RwLock<HashMap<String, Arc<ResourceBundle>>>>,
    by_type: Arc<RwLock<HashMap<ResourceType, Arc<Vec<ResourceRecord>>>>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn bundle(&self, university_id: &str) -> Option<Arc<ResourceBundle>> {
        self.bundles.read().await.get(university_id).cloned()
    }

    pub async fn store_bundle(&self, university_id: &str, bundle: ResourceBundle) -> Arc<ResourceBundle> {
        let bundle = Arc::new(bundle);
        self.bundles
            .write()
            .await
            .insert(university_id.to_string(), bundle.clone());
        debug!("Cached bundle for {}", university_id);
        bundle
    }

    /// Cross-university records of one type, as loaded for the browse view.
    pub async fn resources_of_type(&self, ty: ResourceType) -> Option<Arc<Vec<ResourceRecord>>> {
        self.by_type.read().await.get(&ty).cloned()
    }

    pub async fn store_resources_of_type(
        &self,
        ty: ResourceType,
        resources: Vec<ResourceRecord>,
    ) -> Arc<Vec<ResourceRecord>> {
        let resources = Arc::new(resources);
        self.by_type.write().await.insert(ty, resources.clone());
        debug!("Cached {} {} records", resources.len(), ty);
        resources
    }

    /// (cached bundles, cached resource types)
    pub async fn stats(&self) -> (usize, usize) {
        (self.bundles.read().await.len(), self.by_type.read().await.len())
    }
}
