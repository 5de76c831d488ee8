use crate::types::{
    BenefitTerm, Benefits, Cost, CostKind, ResourceBundle, ResourceDates, ResourceDetails, ResourceRecord,
    ResourceType,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A raw element read into a record, with what had to be left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: ResourceRecord,
    /// Known fields whose JSON type did not fit, as dotted paths
    /// (`targetAudience`, `cost.amount`, `dates.final`). Top-level ones stay
    /// in `record.extra` as raw data.
    pub rejected_fields: Vec<String>,
    /// JSON kind of the element when it was not an object.
    pub non_object: Option<&'static str>,
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Takes known keys out of one JSON object, one at a time. A value of the
/// wrong JSON type is put back and its path recorded.
struct FieldReader<'a> {
    object: Map<String, Value>,
    prefix: &'static str,
    rejected: &'a mut Vec<String>,
}

impl<'a> FieldReader<'a> {
    fn new(object: Map<String, Value>, prefix: &'static str, rejected: &'a mut Vec<String>) -> Self {
        Self {
            object,
            prefix,
            rejected,
        }
    }

    fn reject(&mut self, key: &str, value: Value) {
        self.rejected.push(format!("{}{}", self.prefix, key));
        self.object.insert(key.to_string(), value);
    }

    fn take<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.object.remove(key)?;
        if value.is_null() {
            return None;
        }
        match T::deserialize(&value) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.reject(key, value);
                None
            }
        }
    }

    fn take_list(&mut self, key: &str) -> Vec<String> {
        self.take(key).unwrap_or_default()
    }

    fn take_flag(&mut self, key: &str) -> bool {
        self.take(key).unwrap_or_default()
    }

    /// Strings as written, numbers in decimal form.
    fn take_text(&mut self, key: &str) -> Option<String> {
        match self.object.remove(key)? {
            Value::String(text) => Some(text),
            Value::Number(n) => Some(n.to_string()),
            Value::Null => None,
            other => {
                self.reject(key, other);
                None
            }
        }
    }

    /// Numbers, or strings holding one (`"15000"`).
    fn take_number(&mut self, key: &str) -> Option<f64> {
        match self.object.remove(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(text) => match text.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                _ => {
                    self.reject(key, Value::String(text));
                    None
                }
            },
            Value::Null => None,
            other => {
                self.reject(key, other);
                None
            }
        }
    }

    fn take_object(&mut self, key: &str) -> Option<Map<String, Value>> {
        match self.object.remove(key)? {
            Value::Object(object) => Some(object),
            Value::Null => None,
            other => {
                self.reject(key, other);
                None
            }
        }
    }

    fn take_term(&mut self, key: &str) -> BenefitTerm {
        self.object
            .remove(key)
            .map(BenefitTerm::from)
            .unwrap_or_default()
    }

    fn into_rest(self) -> Map<String, Value> {
        self.object
    }
}

fn read_dates(object: Map<String, Value>, rejected: &mut Vec<String>) -> ResourceDates {
    let mut dates = ResourceDates::default();
    for (key, value) in object {
        match value {
            Value::String(text) => dates.insert(key, text),
            Value::Null => {}
            _ => rejected.push(format!("dates.{}", key)),
        }
    }
    dates
}

fn read_cost(object: Map<String, Value>, rejected: &mut Vec<String>) -> Cost {
    let mut fields = FieldReader::new(object, "cost.", rejected);
    Cost {
        kind: fields.take_text("type").map(CostKind::from),
        amount: fields.take_number("amount"),
        note: fields.take_text("note"),
    }
}

fn read_benefits(object: Map<String, Value>, rejected: &mut Vec<String>) -> Benefits {
    let mut fields = FieldReader::new(object, "benefits.", rejected);
    Benefits {
        bvi: fields.take_flag("bvi"),
        points100: fields.take_flag("points100"),
        additional_points: fields.take_number("additionalPoints").unwrap_or_default(),
        grants: fields.take_term("grants"),
        tuition_discount: fields.take_term("tuitionDiscount"),
        priority: fields.take_flag("priority"),
        early_admission: fields.take_flag("earlyAdmission"),
    }
}

/// Reads one raw element as a record tagged with `ty`, field by field. Every
/// element yields a record; a non-object element yields an empty one.
pub fn normalize_element(ty: ResourceType, raw: &Value) -> Normalized {
    let mut rejected = Vec::new();

    let Value::Object(object) = raw else {
        return Normalized {
            record: ResourceRecord::empty(ty),
            rejected_fields: rejected,
            non_object: Some(json_kind(raw)),
        };
    };

    let mut fields = FieldReader::new(object.clone(), "", &mut rejected);

    // The raw `type` is the course sub-category and is replaced for every
    // variant; a raw `categoryType` would collide with the derived one.
    let raw_kind = fields.object.remove("type");
    if ty == ResourceType::Course {
        fields.object.remove("categoryType");
    }

    let id = fields.take_text("id");
    let name = fields.take_text("name");
    let description = fields.take_text("description");
    let website = fields.take_text("website");
    let format = fields.take_text("format");
    let target_audience = fields.take_list("targetAudience");
    let dates = fields.take_object("dates");
    let cost = fields.take_object("cost");
    let benefits = fields.take_object("benefits");

    let details = match ty {
        ResourceType::Olympiad => ResourceDetails::Olympiad {
            subjects: fields.take_list("subjects"),
        },
        ResourceType::Course => ResourceDetails::Course {
            subjects: fields.take_list("subjects"),
            category_type: match raw_kind {
                Some(Value::String(kind)) => Some(kind),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Null) | None => None,
                Some(_) => {
                    fields.rejected.push("type".to_string());
                    None
                }
            },
        },
        ResourceType::SummerProgram => ResourceDetails::SummerProgram {
            subjects: fields.take_list("subjects"),
        },
        ResourceType::School => ResourceDetails::School {
            profiles: fields.take_list("profiles"),
            grades: fields.take_list("grades"),
        },
        ResourceType::PracticalEvent => ResourceDetails::PracticalEvent,
        ResourceType::InfoEvent => ResourceDetails::InfoEvent,
        ResourceType::EducationalEvent => ResourceDetails::EducationalEvent,
        ResourceType::OnlineResource => ResourceDetails::OnlineResource,
    };

    // Payload lists the variant does not carry stay in `extra` untouched.
    let extra = fields.into_rest();

    let record = ResourceRecord {
        id,
        name,
        description,
        website,
        format,
        target_audience,
        dates: dates.map(|d| read_dates(d, &mut rejected)).unwrap_or_default(),
        cost: cost.map(|c| read_cost(c, &mut rejected)),
        benefits: benefits.map(|b| read_benefits(b, &mut rejected)),
        details,
        extra,
    };

    Normalized {
        record,
        rejected_fields: rejected,
        non_object: None,
    }
}

/// Copies one raw element into a record tagged with `ty`.
pub fn normalize_record(ty: ResourceType, raw: &Value) -> ResourceRecord {
    normalize_element(ty, raw).record
}

/// Tags every element of a single category, keeping source order and count.
pub fn aggregate_category(ty: ResourceType, raw_records: &[Value]) -> Vec<ResourceRecord> {
    raw_records
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let normalized = normalize_element(ty, raw);
            if let Some(kind) = normalized.non_object {
                warn!("{} record #{} is a JSON {}, not an object", ty, index, kind);
            } else if !normalized.rejected_fields.is_empty() {
                debug!(
                    "{} record #{}: ignored fields {:?}",
                    ty, index, normalized.rejected_fields
                );
            }
            normalized.record
        })
        .collect()
}

/// Flattens a bundle into one sequence: categories in `ResourceType::ALL`
/// order, each in its source order.
pub fn aggregate(bundle: &ResourceBundle) -> Vec<ResourceRecord> {
    let mut resources = Vec::with_capacity(bundle.len());

    for ty in ResourceType::ALL {
        resources.extend(aggregate_category(ty, bundle.category(ty)));
    }

    debug!("Aggregated {} resources", resources.len());
    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_course_keeps_category_type() {
        let record = normalize_record(
            ResourceType::Course,
            &json!({ "name": "Подготовка к ЕГЭ", "type": "online", "subjects": ["математика"] }),
        );

        assert_eq!(record.resource_type(), ResourceType::Course);
        assert_eq!(record.category_type(), Some("online"));
        assert_eq!(record.details.subjects(), ["математика".to_string()]);

        let serialized = serde_json::to_value(&record).unwrap();
        assert_eq!(serialized["type"], "course");
        assert_eq!(serialized["categoryType"], "online");
    }

    #[test]
    fn test_raw_category_type_is_not_duplicated() {
        let record = normalize_record(
            ResourceType::Course,
            &json!({ "name": "Курс", "type": "offline", "categoryType": "stale" }),
        );

        assert_eq!(record.category_type(), Some("offline"));
        assert!(!record.extra.contains_key("categoryType"));

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text.matches("\"categoryType\"").count(), 1);
        assert_eq!(text.matches("\"type\"").count(), 1);
    }

    #[test]
    fn test_raw_type_is_overwritten_for_other_variants() {
        let record = normalize_record(
            ResourceType::InfoEvent,
            &json!({ "name": "День открытых дверей", "type": "offline" }),
        );

        assert_eq!(record.resource_type(), ResourceType::InfoEvent);
        assert_eq!(record.category_type(), None);
        assert_eq!(serde_json::to_value(&record).unwrap()["type"], "infoEvent");
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let record = normalize_record(
            ResourceType::Olympiad,
            &json!({ "id": 7, "name": "Физтех", "level": "I", "subjects": ["физика"] }),
        );

        assert_eq!(record.id.as_deref(), Some("7"));
        assert_eq!(record.extra.get("level"), Some(&json!("I")));
        assert_eq!(serde_json::to_value(&record).unwrap()["level"], "I");
    }

    #[test]
    fn test_school_payload() {
        let record = normalize_record(
            ResourceType::School,
            &json!({ "name": "Лицей", "profiles": ["физмат"], "grades": ["10", "11"], "subjects": ["физика"] }),
        );

        match &record.details {
            ResourceDetails::School { profiles, grades } => {
                assert_eq!(profiles, &vec!["физмат".to_string()]);
                assert_eq!(grades.len(), 2);
            }
            other => panic!("unexpected details: {:?}", other),
        }
        assert_eq!(record.extra.get("subjects"), Some(&json!(["физика"])));
    }

    #[test]
    fn test_null_fields_are_tolerated() {
        let record = normalize_record(
            ResourceType::Olympiad,
            &json!({
                "name": "Олимпиада",
                "dates": null,
                "targetAudience": null,
                "benefits": { "bvi": null, "additionalPoints": 5, "grants": null }
            }),
        );

        let benefits = record.benefits.unwrap();
        assert!(!benefits.bvi);
        assert_eq!(benefits.additional_points, 5.0);
        assert_eq!(benefits.grants, BenefitTerm::Null);
        assert_eq!(benefits.tuition_discount, BenefitTerm::Unspecified);
        assert!(record.dates.is_empty());
    }

    #[test]
    fn test_wrongly_typed_fields_keep_the_record() {
        let normalized = normalize_element(
            ResourceType::Olympiad,
            &json!({
                "name": "Высшая проба",
                "targetAudience": "9-11 классы",
                "dates": { "final": 20250320, "event": "01.02.2025" },
                "benefits": { "bvi": "да", "grants": true, "additionalPoints": "7" }
            }),
        );
        let record = &normalized.record;

        assert_eq!(record.name.as_deref(), Some("Высшая проба"));
        assert!(record.target_audience.is_empty());
        assert_eq!(record.extra.get("targetAudience"), Some(&json!("9-11 классы")));
        assert_eq!(record.dates.get("event"), Some("01.02.2025"));
        assert_eq!(record.dates.get("final"), None);

        let benefits = record.benefits.as_ref().unwrap();
        assert!(!benefits.bvi);
        assert_eq!(benefits.grants, BenefitTerm::Given(json!(true)));
        assert_eq!(benefits.additional_points, 7.0);

        assert_eq!(
            normalized.rejected_fields,
            vec!["targetAudience", "dates.final", "benefits.bvi"]
        );
        assert_eq!(normalized.non_object, None);

        let serialized = serde_json::to_value(record).unwrap();
        assert_eq!(serialized["targetAudience"], "9-11 классы");
    }

    #[test]
    fn test_cost_amount_as_text() {
        let normalized = normalize_element(
            ResourceType::Course,
            &json!({ "cost": { "type": "платно", "amount": "15000", "note": ["x"] } }),
        );
        let cost = normalized.record.cost.unwrap();

        assert!(cost.is_paid());
        assert_eq!(cost.amount, Some(15000.0));
        assert_eq!(cost.note, None);
        assert_eq!(normalized.rejected_fields, vec!["cost.note"]);
    }

    #[test]
    fn test_aggregation_keeps_every_element() {
        let bundle: ResourceBundle = serde_json::from_value(json!({
            "olympiads": [
                { "name": "A", "targetAudience": "9-11 классы" },
                { "name": "B", "benefits": { "grants": true } },
                { "name": "C", "dates": { "final": 20250320 } }
            ],
            "courses": [{ "name": "D", "cost": { "type": "платно", "amount": "15000" } }],
            "onlineResources": ["not an object", null]
        }))
        .unwrap();

        let resources = aggregate(&bundle);
        assert_eq!(resources.len(), bundle.len());
        assert_eq!(resources.len(), 6);

        let names: Vec<_> = resources.iter().map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec![Some("A"), Some("B"), Some("C"), Some("D"), None, None]);
        assert_eq!(resources[4].resource_type(), ResourceType::OnlineResource);
    }

    #[test]
    fn test_non_object_element() {
        let normalized = normalize_element(ResourceType::School, &json!("oops"));
        assert_eq!(normalized.non_object, Some("string"));
        assert_eq!(normalized.record, ResourceRecord::empty(ResourceType::School));
    }
}
