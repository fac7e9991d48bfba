//! In-memory values consumed and produced by validation.
//!
//! `FieldValue` is a superset of JSON: besides the JSON kinds it carries native
//! dates and opaque binary blobs, so that coerced output (and form uploads) can
//! be represented without re-encoding them as strings.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered field name → value map; the output of every successful validation.
pub type Record = IndexMap<String, FieldValue>;

// 2^63, exactly representable. `i64::MAX as f64` rounds up to this value.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The `i64` equal to `f`, if `f` is whole and inside the `i64` range.
pub(crate) fn exact_i64(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= -I64_UPPER_BOUND && f < I64_UPPER_BOUND).then_some(f as i64)
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(DateTime<Utc>),
    Binary(Vec<u8>),
    Array(Vec<FieldValue>),
    Object(Record),
}

impl FieldValue {
    /// Human name of the value kind, used in "Expected x, received y" messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Int(_) => "number",
            FieldValue::Float(f) if f.is_nan() => "nan",
            FieldValue::Float(_) => "number",
            FieldValue::String(_) => "string",
            FieldValue::Date(_) => "date",
            FieldValue::Binary(_) => "binary",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Record> {
        match self {
            FieldValue::Object(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// JSON rendering for transport. Dates become RFC 3339 strings with
    /// millisecond precision, blobs become arrays of bytes.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Int(i) => serde_json::Value::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Date(d) => {
                serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::Binary(bytes) => serde_json::Value::from(bytes.clone()),
            FieldValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json).collect())
            }
            FieldValue::Object(record) => record_to_json(record),
        }
    }
}

/// JSON rendering of a whole record, preserving field order.
pub fn record_to_json(record: &Record) -> serde_json::Value {
    serde_json::Value::Object(
        record
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => FieldValue::Int(i),
                // above i64::MAX: kept as a float so integer fields can report it
                (None, Some(u)) => FieldValue::Float(u as f64),
                (None, None) => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, FieldValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        FieldValue::from(value.clone())
    }
}

impl From<Record> for FieldValue {
    fn from(record: Record) -> Self {
        FieldValue::Object(record)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_integers_and_floats_apart() {
        assert_eq!(FieldValue::from(json!(30)), FieldValue::Int(30));
        assert_eq!(FieldValue::from(json!(5.5)), FieldValue::Float(5.5));
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Null);
        assert_eq!(
            FieldValue::from(json!(9_223_372_036_854_775_808u64)),
            FieldValue::Float(9_223_372_036_854_775_808.0)
        );
    }

    #[test]
    fn test_exact_i64_bounds() {
        assert_eq!(exact_i64(4.0), Some(4));
        assert_eq!(exact_i64(-9_223_372_036_854_775_808.0), Some(i64::MIN));
        assert_eq!(exact_i64(i64::MAX as f64), None);
        assert_eq!(exact_i64(2.5), None);
        assert_eq!(exact_i64(f64::INFINITY), None);
    }

    #[test]
    fn test_from_json_preserves_field_order() {
        let value = FieldValue::from(json!({"b": 1, "a": 2}));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        // serde_json without preserve_order sorts keys
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"a".to_string()));
    }

    #[test]
    fn test_date_renders_as_iso_string() {
        let date = Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            FieldValue::Date(date).to_json(),
            json!("1980-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FieldValue::Int(1).kind(), "number");
        assert_eq!(FieldValue::from("x").kind(), "string");
        assert_eq!(FieldValue::Binary(vec![1]).kind(), "binary");
    }
}
