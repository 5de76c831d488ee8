use std::env;
// Use the interfaces crate for the shared data contract
pub use interfaces::defs::{
    AdmissionsContacts, BenefitTerm, Benefits, Contacts, Cost, CostKind, DateKind, ResourceBundle, ResourceDates,
    ResourceDetails, ResourceRecord, ResourceType, SchoolContacts, University, UniversityIndex,
    UnknownResourceType, FREE_COST_LITERAL, PAID_COST_LITERAL,
};

pub const DEFAULT_DATA_LOCATION: &str = "data";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_file_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Resource-Catalog/1.0".to_string(),
            timeout_seconds: 10,
            max_retries: 2,
            retry_delay_seconds: 1,
            max_file_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Where catalog data lives: a directory of static files or a base URL
/// serving the same layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Directory(std::path::PathBuf),
    Url(String),
}

impl DataLocation {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataLocation::Url(location.to_string())
        } else {
            DataLocation::Directory(location.into())
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub data: DataLocation,
    pub fetch: FetchConfig,
}

impl CatalogConfig {
    /// Reads `CATALOG_DATA` and `CATALOG_TIMEOUT_SECONDS`, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let data = env::var("CATALOG_DATA").unwrap_or_else(|_| DEFAULT_DATA_LOCATION.to_string());

        let mut fetch = FetchConfig::default();
        if let Some(timeout) = env::var("CATALOG_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
        {
            fetch.timeout_seconds = timeout;
        }

        Self {
            data: DataLocation::parse(&data),
            fetch,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data: DataLocation::parse(DEFAULT_DATA_LOCATION),
            fetch: FetchConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Data file too large: {size_mb}MB from {path}")]
    FileTooLarge { path: String, size_mb: usize },

    #[error("University not found: {id}")]
    UniversityNotFound { id: String },

    #[error("Unexpected JSON shape in {path}: expected {expected}")]
    UnexpectedShape { path: String, expected: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
