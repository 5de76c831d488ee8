use crate::dates::{date_portion, parse_date, DateWindow};
use crate::types::{Benefits, Cost, DateKind, ResourceDates, ResourceRecord, ResourceType};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Length of the "upcoming" window, counted from today inclusive.
pub const UPCOMING_WINDOW_DAYS: u64 = 90;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterParseError {
    #[error("unknown resource type filter: {0}")]
    Type(String),

    #[error("unknown benefit: {0}")]
    Benefit(String),

    #[error("unknown cost filter: {0} (expected all, free or paid)")]
    Cost(String),

    #[error("unknown date filter: {0} (expected all, upcoming or active-registration)")]
    Date(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ResourceType),
}

impl TypeFilter {
    pub fn matches(&self, record: &ResourceRecord) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(ty) => record.resource_type() == *ty,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(TypeFilter::All);
        }
        s.parse::<ResourceType>()
            .map(TypeFilter::Only)
            .map_err(|_| FilterParseError::Type(s.to_string()))
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(ty) => write!(f, "{}", ty),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BenefitKey {
    Bvi,
    Points100,
    AdditionalPoints,
    Grants,
    TuitionDiscount,
    Priority,
    EarlyAdmission,
}

impl BenefitKey {
    pub const ALL: [BenefitKey; 7] = [
        BenefitKey::Bvi,
        BenefitKey::Points100,
        BenefitKey::AdditionalPoints,
        BenefitKey::Grants,
        BenefitKey::TuitionDiscount,
        BenefitKey::Priority,
        BenefitKey::EarlyAdmission,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BenefitKey::Bvi => "bvi",
            BenefitKey::Points100 => "points100",
            BenefitKey::AdditionalPoints => "additionalPoints",
            BenefitKey::Grants => "grants",
            BenefitKey::TuitionDiscount => "tuitionDiscount",
            BenefitKey::Priority => "priority",
            BenefitKey::EarlyAdmission => "earlyAdmission",
        }
    }

    /// `grants` and `tuitionDiscount` count unless explicitly `null`; an
    /// absent field satisfies the key.
    pub fn is_satisfied_by(&self, benefits: &Benefits) -> bool {
        match self {
            BenefitKey::Bvi => benefits.bvi,
            BenefitKey::Points100 => benefits.points100,
            BenefitKey::AdditionalPoints => benefits.additional_points > 0.0,
            BenefitKey::Grants => !benefits.grants.is_null(),
            BenefitKey::TuitionDiscount => !benefits.tuition_discount.is_null(),
            BenefitKey::Priority => benefits.priority,
            BenefitKey::EarlyAdmission => benefits.early_admission,
        }
    }
}

impl FromStr for BenefitKey {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BenefitKey::ALL
            .into_iter()
            .find(|key| key.key() == s)
            .ok_or_else(|| FilterParseError::Benefit(s.to_string()))
    }
}

impl fmt::Display for BenefitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostFilter {
    #[default]
    All,
    Free,
    Paid,
}

impl CostFilter {
    /// `All` accepts records without a cost; `Free` and `Paid` never do.
    pub fn matches(&self, cost: Option<&Cost>) -> bool {
        match self {
            CostFilter::All => true,
            CostFilter::Free => cost.is_some_and(Cost::is_free),
            CostFilter::Paid => cost.is_some_and(Cost::is_paid),
        }
    }
}

impl FromStr for CostFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CostFilter::All),
            "free" => Ok(CostFilter::Free),
            "paid" => Ok(CostFilter::Paid),
            other => Err(FilterParseError::Cost(other.to_string())),
        }
    }
}

impl fmt::Display for CostFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CostFilter::All => "all",
            CostFilter::Free => "free",
            CostFilter::Paid => "paid",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    Upcoming,
    ActiveRegistration,
}

impl DateFilter {
    pub fn matches(&self, record: &ResourceRecord, today: NaiveDate) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::Upcoming => is_upcoming(record, today),
            DateFilter::ActiveRegistration => is_registration_active(&record.dates, today),
        }
    }
}

impl FromStr for DateFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DateFilter::All),
            "upcoming" => Ok(DateFilter::Upcoming),
            "active-registration" => Ok(DateFilter::ActiveRegistration),
            other => Err(FilterParseError::Date(other.to_string())),
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateFilter::All => "all",
            DateFilter::Upcoming => "upcoming",
            DateFilter::ActiveRegistration => "active-registration",
        })
    }
}

/// The user's active filters. `Default` is the "show everything" state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub resource_type: TypeFilter,
    pub benefits: BTreeSet<BenefitKey>,
    pub cost: CostFilter,
    pub date: DateFilter,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }

    /// All dimensions must accept the record.
    pub fn matches(&self, record: &ResourceRecord, today: NaiveDate) -> bool {
        self.resource_type.matches(record)
            && matches_benefits(&self.benefits, record)
            && self.cost.matches(record.cost.as_ref())
            && self.date.matches(record, today)
    }

    pub fn apply(&self, resources: &[ResourceRecord], today: NaiveDate) -> Vec<ResourceRecord> {
        apply_filters(resources, self, today)
    }
}

/// Returns the records accepted by `filters`, in their original order.
pub fn apply_filters(resources: &[ResourceRecord], filters: &FilterState, today: NaiveDate) -> Vec<ResourceRecord> {
    let visible: Vec<ResourceRecord> = resources
        .iter()
        .filter(|record| filters.matches(record, today))
        .cloned()
        .collect();

    debug!(
        "Filters {:?} kept {}/{} resources",
        filters,
        visible.len(),
        resources.len()
    );
    visible
}

/// Any selected benefit suffices. With a non-empty selection a record
/// without a benefits object is rejected.
pub fn matches_benefits(selected: &BTreeSet<BenefitKey>, record: &ResourceRecord) -> bool {
    if selected.is_empty() {
        return true;
    }
    match &record.benefits {
        Some(benefits) => selected.iter().any(|key| key.is_satisfied_by(benefits)),
        None => false,
    }
}

/// The single date that represents when a resource takes place.
pub fn event_date(record: &ResourceRecord) -> Option<&str> {
    if record.resource_type() == ResourceType::Olympiad {
        if let Some(final_round) = record.dates.kind(DateKind::Final) {
            return Some(final_round);
        }
    }
    record
        .dates
        .kind(DateKind::Event)
        .or_else(|| record.dates.kind(DateKind::Program))
        .map(date_portion)
}

/// Records whose event date is missing or unreadable are kept.
pub fn is_upcoming(record: &ResourceRecord, today: NaiveDate) -> bool {
    let Some(value) = event_date(record) else {
        return true;
    };
    match parse_date(value) {
        Ok(date) => DateWindow::starting_at(today, UPCOMING_WINDOW_DAYS).contains(date),
        Err(_) => true,
    }
}

/// Records without a readable registration range are rejected.
pub fn is_registration_active(dates: &ResourceDates, today: NaiveDate) -> bool {
    dates
        .kind(DateKind::Registration)
        .and_then(|range| DateWindow::parse_range(range).ok())
        .is_some_and(|window| window.contains(today))
}
