use crate::aggregator::aggregate_category;
use crate::cache::ResourceCache;
use crate::traits::DataSource;
use crate::types::{
    CatalogError, ResourceBundle, ResourceRecord, ResourceType, Result, University, UniversityIndex,
};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const INDEX_PATH: &str = "index.json";

/// Location of one category file relative to the data root.
pub fn category_path(university_id: &str, ty: ResourceType) -> String {
    format!("universities/{}/{}", university_id, ty.file_name())
}

pub struct CatalogLoader {
    source: Arc<dyn DataSource>,
    cache: ResourceCache,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Loads `index.json`. This is the one load whose failure is reported to
    /// the caller.
    pub async fn load_universities(&self) -> Result<Vec<University>> {
        let value = self.source.fetch_json(INDEX_PATH).await?;
        let index: UniversityIndex = serde_json::from_value(value)?;

        info!(
            "Loaded {} universities from {}",
            index.universities.len(),
            self.source.source_name()
        );
        Ok(index.universities)
    }

    /// Loads all eight category files for a university concurrently. A
    /// category that fails to load is empty; the bundle itself never fails.
    pub async fn load_bundle(&self, university_id: &str) -> Arc<ResourceBundle> {
        if let Some(bundle) = self.cache.bundle(university_id).await {
            debug!("Using cached bundle for {}", university_id);
            return bundle;
        }

        let requests = ResourceType::ALL
            .into_iter()
            .map(|ty| self.load_category(university_id, ty));
        let categories = join_all(requests).await;

        let mut bundle = ResourceBundle::default();
        for (ty, records) in ResourceType::ALL.into_iter().zip(categories) {
            *bundle.category_mut(ty) = records;
        }

        info!("Loaded bundle for {} with {} records", university_id, bundle.len());
        self.cache.store_bundle(university_id, bundle).await
    }

    /// Every record of one type across `universities`, in index order. Cached
    /// per type for the rest of the session.
    pub async fn load_resources_by_type(
        &self,
        ty: ResourceType,
        universities: &[University],
    ) -> Arc<Vec<ResourceRecord>> {
        if let Some(resources) = self.cache.resources_of_type(ty).await {
            debug!("Using cached {} records", ty);
            return resources;
        }

        let loads = universities.iter().map(|university| async move {
            match self.cache.bundle(&university.id).await {
                Some(bundle) => aggregate_category(ty, bundle.category(ty)),
                None => aggregate_category(ty, &self.load_category(&university.id, ty).await),
            }
        });
        let resources: Vec<ResourceRecord> = join_all(loads).await.into_iter().flatten().collect();

        info!(
            "Loaded {} {} records across {} universities",
            resources.len(),
            ty,
            universities.len()
        );
        self.cache.store_resources_of_type(ty, resources).await
    }

    async fn load_category(&self, university_id: &str, ty: ResourceType) -> Vec<Value> {
        match self.fetch_category(university_id, ty).await {
            Ok(records) => records,
            Err(e) => {
                warn!("No {} data for {}: {}", ty.bundle_key(), university_id, e);
                Vec::new()
            }
        }
    }

    async fn fetch_category(&self, university_id: &str, ty: ResourceType) -> Result<Vec<Value>> {
        let path = category_path(university_id, ty);
        match self.source.fetch_json(&path).await? {
            Value::Array(records) => Ok(records),
            Value::Null => Ok(Vec::new()),
            _ => Err(CatalogError::UnexpectedShape {
                path,
                expected: "an array of resources",
            }),
        }
    }
}
