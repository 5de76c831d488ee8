use crate::aggregator::aggregate;
use crate::filter::{BenefitKey, CostFilter, DateFilter, FilterState, TypeFilter};
use crate::types::{CatalogError, ResourceBundle, ResourceRecord, Result, University};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::info;

/// One user action on the filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Type(TypeFilter),
    Benefits(BTreeSet<BenefitKey>),
    Cost(CostFilter),
    Date(DateFilter),
}

#[derive(Debug, Clone)]
struct Selection {
    university_id: String,
    resources: Vec<ResourceRecord>,
}

/// Session state owned by the presentation layer: the university list, the
/// university whose results are shown, and the active filters.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    universities: Vec<University>,
    selection: Option<Selection>,
    filters: FilterState,
}

impl AppState {
    pub fn new(universities: Vec<University>) -> Self {
        Self {
            universities,
            selection: None,
            filters: FilterState::default(),
        }
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn find_university(&self, university_id: &str) -> Option<&University> {
        self.universities.iter().find(|u| u.id == university_id)
    }

    /// Enters the results view for `university_id` with freshly aggregated
    /// records and default filters.
    pub fn show_results(&mut self, university_id: &str, bundle: &ResourceBundle) -> Result<&University> {
        let index = self
            .universities
            .iter()
            .position(|u| u.id == university_id)
            .ok_or_else(|| CatalogError::UniversityNotFound {
                id: university_id.to_string(),
            })?;

        let resources = aggregate(bundle);
        info!("Showing {} resources for {}", resources.len(), university_id);

        self.selection = Some(Selection {
            university_id: university_id.to_string(),
            resources,
        });
        self.reset_filters();
        Ok(&self.universities[index])
    }

    /// Returns to the selection view.
    pub fn show_main_page(&mut self) {
        self.selection = None;
        self.reset_filters();
    }

    pub fn selected_university(&self) -> Option<&University> {
        self.selection
            .as_ref()
            .and_then(|selection| self.find_university(&selection.university_id))
    }

    /// All aggregated records of the selected university, unfiltered.
    pub fn resources(&self) -> &[ResourceRecord] {
        self.selection
            .as_ref()
            .map(|selection| selection.resources.as_slice())
            .unwrap_or_default()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn update_filter(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Type(resource_type) => self.filters.resource_type = resource_type,
            FilterUpdate::Benefits(benefits) => self.filters.benefits = benefits,
            FilterUpdate::Cost(cost) => self.filters.cost = cost,
            FilterUpdate::Date(date) => self.filters.date = date,
        }
    }

    /// Checks or unchecks one benefit box.
    pub fn toggle_benefit(&mut self, key: BenefitKey) {
        if !self.filters.benefits.remove(&key) {
            self.filters.benefits.insert(key);
        }
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
    }

    /// The selected university's records that pass the active filters, in
    /// aggregation order.
    pub fn visible_resources(&self, today: NaiveDate) -> Vec<ResourceRecord> {
        self.filters.apply(self.resources(), today)
    }
}
