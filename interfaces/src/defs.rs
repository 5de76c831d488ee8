use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::de::nullable_default;

pub const FREE_COST_LITERAL: &str = "бесплатно";
pub const PAID_COST_LITERAL: &str = "платно";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub main_directions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Contacts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admissions: Option<AdmissionsContacts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<SchoolContacts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionsContacts {
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hotline: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolContacts {
    pub website: Option<String>,
    pub email: Option<String>,
}

/// Contents of `index.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniversityIndex {
    #[serde(default, deserialize_with = "nullable_default")]
    pub universities: Vec<University>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Olympiad,
    Course,
    School,
    SummerProgram,
    PracticalEvent,
    InfoEvent,
    EducationalEvent,
    OnlineResource,
}

impl ResourceType {
    /// Every resource type, in bundle aggregation order.
    pub const ALL: [ResourceType; 8] = [
        ResourceType::Olympiad,
        ResourceType::Course,
        ResourceType::School,
        ResourceType::SummerProgram,
        ResourceType::PracticalEvent,
        ResourceType::InfoEvent,
        ResourceType::EducationalEvent,
        ResourceType::OnlineResource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Olympiad => "olympiad",
            ResourceType::Course => "course",
            ResourceType::School => "school",
            ResourceType::SummerProgram => "summerProgram",
            ResourceType::PracticalEvent => "practicalEvent",
            ResourceType::InfoEvent => "infoEvent",
            ResourceType::EducationalEvent => "educationalEvent",
            ResourceType::OnlineResource => "onlineResource",
        }
    }

    /// Name of the bundle array (and data file stem) holding this type.
    pub fn bundle_key(&self) -> &'static str {
        match self {
            ResourceType::Olympiad => "olympiads",
            ResourceType::Course => "courses",
            ResourceType::School => "schools",
            ResourceType::SummerProgram => "summerPrograms",
            ResourceType::PracticalEvent => "practicalEvents",
            ResourceType::InfoEvent => "infoEvents",
            ResourceType::EducationalEvent => "educationalEvents",
            ResourceType::OnlineResource => "onlineResources",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.bundle_key())
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type: {0}")]
pub struct UnknownResourceType(pub String);

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s || ty.bundle_key() == s)
            .ok_or_else(|| UnknownResourceType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateKind {
    Registration,
    Event,
    Qualification,
    Final,
    ApplicationDeadline,
    Courses,
    Admissions,
    StartOfYear,
    Program,
}

impl DateKind {
    pub const ALL: [DateKind; 9] = [
        DateKind::Registration,
        DateKind::Event,
        DateKind::Qualification,
        DateKind::Final,
        DateKind::ApplicationDeadline,
        DateKind::Courses,
        DateKind::Admissions,
        DateKind::StartOfYear,
        DateKind::Program,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DateKind::Registration => "registration",
            DateKind::Event => "event",
            DateKind::Qualification => "qualification",
            DateKind::Final => "final",
            DateKind::ApplicationDeadline => "applicationDeadline",
            DateKind::Courses => "courses",
            DateKind::Admissions => "admissions",
            DateKind::StartOfYear => "startOfYear",
            DateKind::Program => "program",
        }
    }

    pub fn from_key(key: &str) -> Option<DateKind> {
        DateKind::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Date strings keyed by date kind. Values are free text; parsing happens in
/// the catalog engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDates(BTreeMap<String, Option<String>>);

impl ResourceDates {
    /// Non-empty value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|value| value.as_deref())
            .filter(|value| !value.is_empty())
    }

    pub fn kind(&self, kind: DateKind) -> Option<&str> {
        self.get(kind.key())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), Some(value.into()));
    }

    /// Non-empty entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(key, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((key.as_str(), v)),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostKind {
    Free,
    Paid,
    Other(String),
}

impl From<String> for CostKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            FREE_COST_LITERAL | "free" => CostKind::Free,
            PAID_COST_LITERAL | "paid" => CostKind::Paid,
            _ => CostKind::Other(value),
        }
    }
}

impl Serialize for CostKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            CostKind::Free => FREE_COST_LITERAL,
            CostKind::Paid => PAID_COST_LITERAL,
            CostKind::Other(other) => other,
        })
    }
}

impl<'de> Deserialize<'de> for CostKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(CostKind::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CostKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Cost {
    pub fn is_free(&self) -> bool {
        self.kind == Some(CostKind::Free)
    }

    pub fn is_paid(&self) -> bool {
        self.kind == Some(CostKind::Paid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefits {
    #[serde(default, deserialize_with = "nullable_default")]
    pub bvi: bool,
    #[serde(default, deserialize_with = "nullable_default")]
    pub points100: bool,
    #[serde(default, deserialize_with = "nullable_default")]
    pub additional_points: f64,
    #[serde(default, skip_serializing_if = "BenefitTerm::is_unspecified")]
    pub grants: BenefitTerm,
    #[serde(default, skip_serializing_if = "BenefitTerm::is_unspecified")]
    pub tuition_discount: BenefitTerm,
    #[serde(default, deserialize_with = "nullable_default")]
    pub priority: bool,
    #[serde(default, deserialize_with = "nullable_default")]
    pub early_admission: bool,
}

/// A benefit given as free-form data (`grants`, `tuitionDiscount`). An absent
/// field and an explicit `null` are different states.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BenefitTerm {
    #[default]
    Unspecified,
    Null,
    Given(Value),
}

impl BenefitTerm {
    pub fn is_unspecified(&self) -> bool {
        matches!(self, BenefitTerm::Unspecified)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, BenefitTerm::Null)
    }

    /// Badge text for a truthy value: strings as written, non-zero numbers in
    /// decimal, `true` as an empty string.
    pub fn display_text(&self) -> Option<String> {
        match self {
            BenefitTerm::Given(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            BenefitTerm::Given(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            BenefitTerm::Given(Value::Bool(true)) => Some(String::new()),
            BenefitTerm::Given(Value::Array(_) | Value::Object(_)) => Some(String::new()),
            _ => None,
        }
    }
}

impl From<Value> for BenefitTerm {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => BenefitTerm::Null,
            value => BenefitTerm::Given(value),
        }
    }
}

impl Serialize for BenefitTerm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BenefitTerm::Unspecified | BenefitTerm::Null => serializer.serialize_unit(),
            BenefitTerm::Given(value) => value.serialize(serializer),
        }
    }
}

// Only reached for present fields; absent ones take the `Unspecified` default.
impl<'de> Deserialize<'de> for BenefitTerm {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(BenefitTerm::from)
    }
}

/// Per-variant payload of an aggregated record. The serialized `type` tag is
/// the aggregate discriminant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResourceDetails {
    Olympiad {
        subjects: Vec<String>,
    },
    Course {
        subjects: Vec<String>,
        #[serde(rename = "categoryType", skip_serializing_if = "Option::is_none")]
        category_type: Option<String>,
    },
    School {
        profiles: Vec<String>,
        grades: Vec<String>,
    },
    SummerProgram {
        subjects: Vec<String>,
    },
    PracticalEvent,
    InfoEvent,
    EducationalEvent,
    OnlineResource,
}

impl ResourceDetails {
    /// The variant for `ty` with no payload.
    pub fn empty(ty: ResourceType) -> Self {
        match ty {
            ResourceType::Olympiad => ResourceDetails::Olympiad { subjects: Vec::new() },
            ResourceType::Course => ResourceDetails::Course {
                subjects: Vec::new(),
                category_type: None,
            },
            ResourceType::School => ResourceDetails::School {
                profiles: Vec::new(),
                grades: Vec::new(),
            },
            ResourceType::SummerProgram => ResourceDetails::SummerProgram { subjects: Vec::new() },
            ResourceType::PracticalEvent => ResourceDetails::PracticalEvent,
            ResourceType::InfoEvent => ResourceDetails::InfoEvent,
            ResourceType::EducationalEvent => ResourceDetails::EducationalEvent,
            ResourceType::OnlineResource => ResourceDetails::OnlineResource,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceDetails::Olympiad { .. } => ResourceType::Olympiad,
            ResourceDetails::Course { .. } => ResourceType::Course,
            ResourceDetails::School { .. } => ResourceType::School,
            ResourceDetails::SummerProgram { .. } => ResourceType::SummerProgram,
            ResourceDetails::PracticalEvent => ResourceType::PracticalEvent,
            ResourceDetails::InfoEvent => ResourceType::InfoEvent,
            ResourceDetails::EducationalEvent => ResourceType::EducationalEvent,
            ResourceDetails::OnlineResource => ResourceType::OnlineResource,
        }
    }

    pub fn subjects(&self) -> &[String] {
        match self {
            ResourceDetails::Olympiad { subjects }
            | ResourceDetails::Course { subjects, .. }
            | ResourceDetails::SummerProgram { subjects } => subjects,
            _ => &[],
        }
    }
}

/// A resource after aggregation: common fields, the typed variant payload and
/// any raw fields the catalog does not interpret.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_audience: Vec<String>,
    #[serde(skip_serializing_if = "ResourceDates::is_empty")]
    pub dates: ResourceDates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Cost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Benefits>,
    #[serde(flatten)]
    pub details: ResourceDetails,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceRecord {
    /// A record of type `ty` with no fields set.
    pub fn empty(ty: ResourceType) -> Self {
        Self {
            id: None,
            name: None,
            description: None,
            website: None,
            format: None,
            target_audience: Vec::new(),
            dates: ResourceDates::default(),
            cost: None,
            benefits: None,
            details: ResourceDetails::empty(ty),
            extra: Map::new(),
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.details.resource_type()
    }

    /// The raw course sub-category, preserved by aggregation.
    pub fn category_type(&self) -> Option<&str> {
        match &self.details {
            ResourceDetails::Course { category_type, .. } => category_type.as_deref(),
            _ => None,
        }
    }
}

/// One university's raw resource arrays, as loaded from its data directory.
/// Absent arrays deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBundle {
    #[serde(default, deserialize_with = "nullable_default")]
    pub olympiads: Vec<Value>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub courses: Vec<Value>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub schools: Vec<Value>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub summer_programs: Vec<Value>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub practical_events: Vec<Value>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub info_events: Vec<Value>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub educational_events: Vec<Value>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub online_resources: Vec<Value>,
}

impl ResourceBundle {
    pub fn category(&self, ty: ResourceType) -> &[Value] {
        match ty {
            ResourceType::Olympiad => &self.olympiads,
            ResourceType::Course => &self.courses,
            ResourceType::School => &self.schools,
            ResourceType::SummerProgram => &self.summer_programs,
            ResourceType::PracticalEvent => &self.practical_events,
            ResourceType::InfoEvent => &self.info_events,
            ResourceType::EducationalEvent => &self.educational_events,
            ResourceType::OnlineResource => &self.online_resources,
        }
    }

    pub fn category_mut(&mut self, ty: ResourceType) -> &mut Vec<Value> {
        match ty {
            ResourceType::Olympiad => &mut self.olympiads,
            ResourceType::Course => &mut self.courses,
            ResourceType::School => &mut self.schools,
            ResourceType::SummerProgram => &mut self.summer_programs,
            ResourceType::PracticalEvent => &mut self.practical_events,
            ResourceType::InfoEvent => &mut self.info_events,
            ResourceType::EducationalEvent => &mut self.educational_events,
            ResourceType::OnlineResource => &mut self.online_resources,
        }
    }

    pub fn len(&self) -> usize {
        ResourceType::ALL.iter().map(|ty| self.category(*ty).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
