//! Core types for dsgrid

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier of a record, as handed out by the data provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Reference to a record of another entity (lookup value)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReference {
    pub id: String,
    pub entity_type: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl EntityReference {
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A cell value that can represent any platform data type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// Empty value
    #[default]
    Null,
    /// Two-options / boolean
    Bool(bool),
    /// Whole number, option set value
    Int(i64),
    /// Floating point
    Float(f64),
    /// Decimal/currency (stored as string for precision)
    Decimal(String),
    /// Text
    String(String),
    /// Date without time
    Date(NaiveDate),
    /// Date with time
    DateTime(NaiveDateTime),
    /// Lookup
    Lookup(EntityReference),
    /// Multi-valued (multi-select option set, `In` filter values, party lists)
    Array(Vec<Value>),
    /// Anything else the provider hands through untouched
    Json(serde_json::Value),
}

impl Value {
    /// Check if the value is empty
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, empty string and empty array all count as "no value"
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Decimal(s) | Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Interpret the value as a calendar date.
    ///
    /// Date-times lose their time component; strings are accepted as
    /// `YYYY-MM-DD` or as an ISO date-time.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            Value::String(s) => parse_date_prefix(s),
            _ => None,
        }
    }
}

fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    None
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
            Value::Lookup(r) => write!(f, "{}", r.name.as_deref().unwrap_or(&r.id)),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

/// One column-level difference reported by a record
///
/// The provider does not distinguish user edits from programmatic ones;
/// that distinction is layered on top by the grid's change tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub column_name: String,
    pub old_value: Value,
    pub new_value: Value,
}

impl FieldChange {
    pub fn new(column_name: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            column_name: column_name.into(),
            old_value,
            new_value,
        }
    }
}

/// Per-cell validation and security information reported by a record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationInfo {
    /// Whether the current value fails validation
    pub error: bool,
    /// Message to show next to the cell
    pub error_message: Option<String>,
    /// Record-level field security; `Some(false)` means the user may not edit
    pub security_editable: Option<bool>,
}

impl ValidationInfo {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            error: true,
            error_message: Some(message.into()),
            security_editable: None,
        }
    }
}

/// What a record row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummarizationType {
    /// Ordinary data record
    #[default]
    None,
    /// Group header row
    Grouping,
    /// Computed total row
    Aggregation,
}

impl SummarizationType {
    pub fn is_summary(&self) -> bool {
        !matches!(self, Self::None)
    }
}
