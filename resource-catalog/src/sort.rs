use crate::types::ResourceRecord;
use std::cmp::Ordering;

/// How a view orders its records. The per-university results view keeps
/// aggregation order; the browse-by-type view sorts by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    #[default]
    SourceOrder,
    NameAlphabetical,
}

impl SortPolicy {
    pub fn sort(&self, resources: &mut [ResourceRecord]) {
        match self {
            SortPolicy::SourceOrder => {}
            SortPolicy::NameAlphabetical => resources.sort_by(compare_names),
        }
    }
}

/// Case-insensitive name order where `ё` sorts with `е`. Missing names
/// compare as empty.
pub fn compare_names(a: &ResourceRecord, b: &ResourceRecord) -> Ordering {
    let a = a.name.as_deref().unwrap_or("");
    let b = b.name.as_deref().unwrap_or("");
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

fn collation_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}
