use anyhow::Result;
use async_trait::async_trait;
use resource_catalog::loader::{category_path, INDEX_PATH};
use resource_catalog::{
    AppState, CatalogError, CatalogLoader, DataSource, DirectorySource, ResourceType,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

/// In-memory catalog that counts requests and fails for unknown paths.
#[derive(Default)]
struct MemorySource {
    documents: HashMap<String, Value>,
    requests: AtomicUsize,
}

impl MemorySource {
    fn with(mut self, path: &str, document: Value) -> Self {
        self.documents.insert(path.to_string(), document);
        self
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    fn source_name(&self) -> String {
        "memory".to_string()
    }

    async fn fetch_json(&self, path: &str) -> resource_catalog::Result<Value> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogError::General(format!("no document at {}", path)))
    }
}

fn index() -> Value {
    json!({
        "universities": [
            { "id": "msu", "name": "МГУ", "mainDirections": ["Математика"] },
            { "id": "mipt", "name": "МФТИ", "website": "https://mipt.ru" }
        ]
    })
}

fn catalog() -> MemorySource {
    MemorySource::default()
        .with(INDEX_PATH, index())
        .with(
            &category_path("msu", ResourceType::Olympiad),
            json!([{ "name": "Ломоносов" }, { "name": "Покори Воробьёвы горы!" }]),
        )
        .with(&category_path("msu", ResourceType::Course), json!({ "oops": true }))
        .with(&category_path("msu", ResourceType::InfoEvent), Value::Null)
        .with(
            &category_path("mipt", ResourceType::Olympiad),
            json!([{ "name": "Физтех" }]),
        )
        .with(
            &category_path("mipt", ResourceType::Course),
            json!([{ "name": "ЗФТШ", "type": "offline" }]),
        )
}

#[tokio::test]
async fn test_bundle_survives_failing_categories() -> Result<()> {
    init_tracing();

    let source = Arc::new(catalog());
    let loader = CatalogLoader::new(source.clone());

    let bundle = loader.load_bundle("msu").await;
    info!("Loaded msu bundle with {} records", bundle.len());

    assert_eq!(bundle.olympiads.len(), 2);
    assert!(bundle.courses.is_empty());
    assert!(bundle.info_events.is_empty());
    assert!(bundle.schools.is_empty());
    assert_eq!(source.requests(), 8);

    // Second load comes from the cache
    let again = loader.load_bundle("msu").await;
    assert!(Arc::ptr_eq(&bundle, &again));
    assert_eq!(source.requests(), 8);

    Ok(())
}

#[tokio::test]
async fn test_missing_index_is_an_error() -> Result<()> {
    init_tracing();

    let loader = CatalogLoader::new(Arc::new(MemorySource::default()));
    assert!(loader.load_universities().await.is_err());

    let empty_index = MemorySource::default().with(INDEX_PATH, json!({ "universities": null }));
    let loader = CatalogLoader::new(Arc::new(empty_index));
    assert!(loader.load_universities().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_browse_by_type_is_cached() -> Result<()> {
    init_tracing();

    let source = Arc::new(catalog());
    let loader = CatalogLoader::new(source.clone());
    let universities = loader.load_universities().await?;
    assert_eq!(source.requests(), 1);

    let olympiads = loader
        .load_resources_by_type(ResourceType::Olympiad, &universities)
        .await;
    let names: Vec<_> = olympiads.iter().filter_map(|r| r.name.as_deref()).collect();
    assert_eq!(names, vec!["Ломоносов", "Покори Воробьёвы горы!", "Физтех"]);
    assert!(olympiads
        .iter()
        .all(|r| r.resource_type() == ResourceType::Olympiad));
    assert_eq!(source.requests(), 3);

    let cached = loader
        .load_resources_by_type(ResourceType::Olympiad, &universities)
        .await;
    assert!(Arc::ptr_eq(&olympiads, &cached));
    assert_eq!(source.requests(), 3);

    // A university whose bundle is already loaded is not refetched
    loader.load_bundle("mipt").await;
    let before = source.requests();
    let courses = loader
        .load_resources_by_type(ResourceType::Course, &universities)
        .await;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].category_type(), Some("offline"));
    assert_eq!(source.requests(), before + 1);

    assert_eq!(loader.cache().stats().await, (1, 2));
    Ok(())
}

struct TempCatalog {
    root: PathBuf,
}

impl TempCatalog {
    fn new() -> Result<Self> {
        let root = std::env::temp_dir().join(format!("resource-catalog-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("universities").join("spbu"))?;
        Ok(Self { root })
    }

    fn write(&self, path: &str, document: &Value) -> Result<()> {
        std::fs::write(self.root.join(path), serde_json::to_string_pretty(document)?)?;
        Ok(())
    }
}

impl Drop for TempCatalog {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

#[tokio::test]
async fn test_directory_source_end_to_end() -> Result<()> {
    init_tracing();

    let catalog = TempCatalog::new()?;
    catalog.write(
        INDEX_PATH,
        &json!({ "universities": [{ "id": "spbu", "name": "СПбГУ" }] }),
    )?;
    catalog.write(
        &category_path("spbu", ResourceType::School),
        &json!([{ "name": "Академическая гимназия", "profiles": ["физмат"], "grades": ["10", "11"] }]),
    )?;
    catalog.write(
        &category_path("spbu", ResourceType::OnlineResource),
        &json!([{ "id": 1, "name": "Канал" }]),
    )?;

    let loader = CatalogLoader::new(Arc::new(DirectorySource::new(&catalog.root)));
    let universities = loader.load_universities().await?;
    assert_eq!(universities.len(), 1);

    let bundle = loader.load_bundle("spbu").await;
    assert_eq!(bundle.len(), 2);

    let mut state = AppState::new(universities);
    let university = state.show_results("spbu", &bundle)?;
    assert_eq!(university.name, "СПбГУ");
    assert_eq!(state.resources().len(), 2);
    assert_eq!(state.resources()[0].resource_type(), ResourceType::School);
    assert_eq!(state.resources()[1].id.as_deref(), Some("1"));

    Ok(())
}

#[tokio::test]
async fn test_directory_source_rejects_escaping_paths() -> Result<()> {
    init_tracing();

    let catalog = TempCatalog::new()?;
    let source = DirectorySource::new(&catalog.root);

    assert!(source.fetch_json("../index.json").await.is_err());
    assert!(source.fetch_json("/etc/hostname").await.is_err());
    assert!(source.fetch_json("index.json").await.is_err());

    Ok(())
}
