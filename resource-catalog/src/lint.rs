use crate::aggregator::normalize_element;
use crate::dates::{date_portion, parse_date, DateParseError, DateWindow};
use crate::types::{DateKind, ResourceBundle, ResourceType};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LintProblem {
    /// The element is not a JSON object.
    Malformed { error: String },
    /// A known field holds the wrong JSON type and is ignored.
    WrongFieldType { field: String },
    MissingName,
    UnrecognizedDate { key: String, value: String },
    InvalidCalendarDate { key: String, value: String },
    MalformedRegistration { value: String, error: String },
}

/// A data problem in one element of a university's category file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintIssue {
    pub university_id: String,
    pub resource_type: ResourceType,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub problem: LintProblem,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}[{}]",
            self.university_id,
            self.resource_type.bundle_key(),
            self.index
        )?;
        if let Some(name) = &self.name {
            write!(f, " {:?}", name)?;
        }
        match &self.problem {
            LintProblem::Malformed { error } => write!(f, ": malformed record ({})", error),
            LintProblem::WrongFieldType { field } => write!(f, ": {} has the wrong type and is ignored", field),
            LintProblem::MissingName => write!(f, ": missing name"),
            LintProblem::UnrecognizedDate { key, value } => {
                write!(f, ": unrecognized {} date {:?}", key, value)
            }
            LintProblem::InvalidCalendarDate { key, value } => {
                write!(f, ": {} date {:?} is not a calendar date", key, value)
            }
            LintProblem::MalformedRegistration { value, error } => {
                write!(f, ": registration {:?}: {}", value, error)
            }
        }
    }
}

/// Reports every element of `bundle` whose data would be silently dropped or
/// ignored by aggregation and filtering.
pub fn lint_bundle(university_id: &str, bundle: &ResourceBundle) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    for ty in ResourceType::ALL {
        for (index, raw) in bundle.category(ty).iter().enumerate() {
            let issue = |name: Option<String>, problem| LintIssue {
                university_id: university_id.to_string(),
                resource_type: ty,
                index,
                name,
                problem,
            };

            let normalized = normalize_element(ty, raw);
            if let Some(kind) = normalized.non_object {
                issues.push(issue(
                    None,
                    LintProblem::Malformed {
                        error: format!("expected an object, found a {}", kind),
                    },
                ));
                continue;
            }
            let record = normalized.record;

            let name = record.name.clone().filter(|name| !name.trim().is_empty());
            if name.is_none() {
                issues.push(issue(None, LintProblem::MissingName));
            }

            for field in normalized.rejected_fields {
                issues.push(issue(name.clone(), LintProblem::WrongFieldType { field }));
            }

            for (key, value) in record.dates.iter() {
                if DateKind::from_key(key) == Some(DateKind::Registration) {
                    if let Err(e) = DateWindow::parse_range(value) {
                        issues.push(issue(
                            name.clone(),
                            LintProblem::MalformedRegistration {
                                value: value.to_string(),
                                error: e.to_string(),
                            },
                        ));
                    }
                    continue;
                }

                let problem = match parse_date(date_portion(value)) {
                    Ok(_) => continue,
                    Err(DateParseError::Unrecognized(_)) => LintProblem::UnrecognizedDate {
                        key: key.to_string(),
                        value: value.to_string(),
                    },
                    Err(DateParseError::InvalidCalendarDate { .. }) => LintProblem::InvalidCalendarDate {
                        key: key.to_string(),
                        value: value.to_string(),
                    },
                };
                issues.push(issue(name.clone(), problem));
            }
        }
    }

    issues
}
