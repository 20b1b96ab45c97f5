//! Incident record model
//!
//! Every field of [`IncidentRecord`] is optional text. The store assigns `id`;
//! nothing else is validated at the data layer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Status given to records built from unparsed reports
pub const FALLBACK_STATUS: &str = "Unknown";

/// Normalized emergency report, stored in the `ecases` collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub status: Option<String>,
}

impl IncidentRecord {
    /// Build a record from an extracted JSON object
    ///
    /// Only the seven recognized fields are read; `id` and any other key are
    /// dropped. Values follow [`scalar_text_value`].
    pub fn from_extracted(object: &Map<String, Value>) -> Self {
        let field = |key: &str| object.get(key).and_then(scalar_text_value);
        Self {
            id: None,
            name: field("name"),
            department: field("department"),
            time: field("time"),
            priority: field("priority"),
            location: field("location"),
            summary: field("summary"),
            status: field("status"),
        }
    }

    /// Minimal record for a report that could not be structured
    pub fn fallback(raw_text: &str, time: String) -> Self {
        Self {
            summary: Some(raw_text.to_string()),
            status: Some(FALLBACK_STATUS.to_string()),
            time: Some(time),
            ..Self::default()
        }
    }
}

/// Textual form of a JSON scalar
///
/// Strings are kept as-is, numbers and booleans are rendered as text.
/// `null`, arrays and objects yield `None` and count as an absent field.
pub fn scalar_text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text_value(&value))
}

/// Responding department
///
/// Used where the service talks to the extraction oracle. Stored records keep
/// the department as a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Fire,
    Police,
    Hospital,
    Ambulance,
    It,
    Forest,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Fire,
        Department::Police,
        Department::Hospital,
        Department::Ambulance,
        Department::It,
        Department::Forest,
    ];

    /// Canonical stored spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Fire => "fire",
            Department::Police => "police",
            Department::Hospital => "hospital",
            Department::Ambulance => "ambulance",
            Department::It => "IT",
            Department::Forest => "forest",
        }
    }

    /// Case-insensitive lookup, ignoring surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(value))
    }

    /// Comma-separated list of canonical spellings
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(Department::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            crate::Error::InvalidInput(format!(
                "Unknown department '{}' (expected one of: {})",
                s,
                Self::allowed_values()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_subset_leaves_rest_absent() {
        let record: IncidentRecord = serde_json::from_value(json!({
            "department": "police",
            "location": "Main St"
        }))
        .unwrap();

        assert_eq!(record.department.as_deref(), Some("police"));
        assert_eq!(record.location.as_deref(), Some("Main St"));
        assert_eq!(record.id, None);
        assert_eq!(record.name, None);
        assert_eq!(record.time, None);
        assert_eq!(record.summary, None);
    }

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let record: IncidentRecord = serde_json::from_value(json!({
            "summary": "Smoke on floor 3",
            "confidence": 0.9,
            "victims": ["a", "b"]
        }))
        .unwrap();

        assert_eq!(record.summary.as_deref(), Some("Smoke on floor 3"));
        assert_eq!(
            record,
            IncidentRecord {
                summary: Some("Smoke on floor 3".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_deserialize_coerces_scalars_and_drops_containers() {
        let record: IncidentRecord = serde_json::from_value(json!({
            "priority": 1,
            "status": true,
            "name": null,
            "location": {"building": "B"}
        }))
        .unwrap();

        assert_eq!(record.priority.as_deref(), Some("1"));
        assert_eq!(record.status.as_deref(), Some("true"));
        assert_eq!(record.name, None);
        assert_eq!(record.location, None);
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let record = IncidentRecord {
            id: Some("abc".into()),
            department: Some("fire".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "abc", "department": "fire"}));
    }

    #[test]
    fn test_from_extracted_drops_id_and_extras() {
        let object = json!({
            "id": "injected",
            "department": "fire",
            "severity_score": 9,
            "summary": "Two cars burning"
        });
        let record = IncidentRecord::from_extracted(object.as_object().unwrap());

        assert_eq!(record.id, None);
        assert_eq!(record.department.as_deref(), Some("fire"));
        assert_eq!(record.summary.as_deref(), Some("Two cars burning"));
        assert_eq!(record.priority, None);
    }

    #[test]
    fn test_fallback_record_shape() {
        let record = IncidentRecord::fallback("help, flooding", "2025-09-15 12:20".into());
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "summary": "help, flooding",
                "status": "Unknown",
                "time": "2025-09-15 12:20"
            })
        );
    }

    #[test]
    fn test_department_parse_is_case_insensitive() {
        assert_eq!(Department::parse("Fire"), Some(Department::Fire));
        assert_eq!(Department::parse(" it "), Some(Department::It));
        assert_eq!(Department::parse("AMBULANCE"), Some(Department::Ambulance));
        assert_eq!(Department::parse("coast guard"), None);
    }

    #[test]
    fn test_department_canonical_spelling() {
        assert_eq!(Department::It.to_string(), "IT");
        assert_eq!(
            Department::allowed_values(),
            "fire, police, hospital, ambulance, IT, forest"
        );
    }

    #[test]
    fn test_department_from_str_error_lists_values() {
        let err = "navy".parse::<Department>().unwrap_err();
        assert!(err.to_string().contains("forest"));
    }
}
