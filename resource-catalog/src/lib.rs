pub mod types;
pub mod dates;
pub mod aggregator;
pub mod filter;
pub mod sort;
pub mod traits;
pub mod sources;
pub mod cache;
pub mod loader;
pub mod state;
pub mod presentation;
pub mod lint;

pub use types::*;
pub use aggregator::{aggregate, aggregate_category, normalize_element, normalize_record, Normalized};
pub use filter::{apply_filters, BenefitKey, CostFilter, DateFilter, FilterState, TypeFilter};
pub use sort::SortPolicy;
pub use traits::DataSource;
pub use sources::{DirectorySource, HttpSource};
pub use cache::ResourceCache;
pub use loader::CatalogLoader;
pub use state::{AppState, FilterUpdate};
pub use presentation::ResourceCard;
pub use lint::{lint_bundle, LintIssue};
