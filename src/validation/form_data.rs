//! Adapter for flat form submissions.
//!
//! HTML forms deliver every value as text. Before validation each text value is
//! given its most specific type, independently of the target schema:
//!
//! 1. `YYYY-MM-DD` optionally followed by `THH:MM[:SS]` becomes a date,
//! 2. otherwise a string that parses entirely as a finite number becomes a number,
//! 3. otherwise it stays a string.
//!
//! Blobs (file uploads) pass through untouched. Digit-only text meant as a
//! string (phone numbers, numeric identifiers) is therefore turned into a
//! number and then fails a string field; this mirrors the behaviour clients
//! already depend on and is logged at debug level rather than corrected.

use once_cell::sync::Lazy;
use regex::Regex;

use super::SchemaValidationEngine;
use super::primitive::parse_date;
use crate::error::ValidationError;
use crate::types::value::exact_i64;
use crate::types::{FieldType, FieldValue, Record, Schema};

static DATE_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}(:\d{2})?)?$").expect("date pattern is valid")
});

/// One submitted form value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Blob(Vec<u8>),
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<Vec<u8>> for FormValue {
    fn from(bytes: Vec<u8>) -> Self {
        FormValue::Blob(bytes)
    }
}

/// Give a single form value its inferred type.
pub fn infer_form_value(value: FormValue) -> FieldValue {
    match value {
        FormValue::Blob(bytes) => FieldValue::Binary(bytes),
        FormValue::Text(text) => infer_text(text),
    }
}

fn infer_text(text: String) -> FieldValue {
    if DATE_LIKE.is_match(&text) {
        if let Some(date) = parse_date(&text) {
            return FieldValue::Date(date);
        }
    }
    if let Some(number) = parse_number(&text) {
        return number;
    }
    FieldValue::String(text)
}

fn parse_number(text: &str) -> Option<FieldValue> {
    if text.is_empty() {
        return None;
    }
    if let Ok(i) = text.parse::<i64>() {
        return Some(FieldValue::Int(i));
    }
    // `f64::from_str` also accepts "inf" and "NaN"; those stay text
    let f = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Some(exact_i64(f).map_or(FieldValue::Float(f), FieldValue::Int))
}

/// Build the object handed to the engine. A repeated key keeps its last value.
pub fn form_fields_to_value<I, K, V>(fields: I) -> FieldValue
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FormValue>,
{
    let mut record = Record::new();
    for (key, value) in fields {
        record.insert(key.into(), infer_form_value(value.into()));
    }
    FieldValue::Object(record)
}

impl SchemaValidationEngine {
    /// Infer the type of every form value, then validate like [`Self::validate`].
    pub fn validate_form_data<I, K, V>(
        &self,
        schema: &Schema,
        fields: I,
    ) -> Result<Record, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FormValue>,
    {
        let value = form_fields_to_value(fields);
        if let FieldValue::Object(record) = &value {
            log_numeric_strings(schema, record);
        }
        self.validate(schema, &value)
    }
}

fn log_numeric_strings(schema: &Schema, record: &Record) {
    for (key, value) in record {
        let numeric = matches!(value, FieldValue::Int(_) | FieldValue::Float(_));
        let wants_text = schema.field(key).is_some_and(|field| {
            matches!(
                field.field_type,
                FieldType::String | FieldType::Email | FieldType::Url | FieldType::Enum(_)
            )
        });
        if numeric && wants_text {
            tracing::debug!(
                schema = %schema.name(),
                field = %key,
                "form value inferred as a number for a text field"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_inference_order() {
        assert_eq!(
            infer_form_value("1990-01-01".into()),
            FieldValue::Date(Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            infer_form_value("2024-05-02T08:15".into()),
            FieldValue::Date(Utc.with_ymd_and_hms(2024, 5, 2, 8, 15, 0).unwrap())
        );
        assert_eq!(infer_form_value("30".into()), FieldValue::Int(30));
        assert_eq!(infer_form_value("-2.5".into()), FieldValue::Float(-2.5));
        assert_eq!(infer_form_value("John".into()), FieldValue::from("John"));
    }

    #[test]
    fn test_edge_cases_stay_text() {
        assert_eq!(infer_form_value("".into()), FieldValue::from(""));
        assert_eq!(infer_form_value("NaN".into()), FieldValue::from("NaN"));
        assert_eq!(infer_form_value("inf".into()), FieldValue::from("inf"));
        assert_eq!(infer_form_value(" 30".into()), FieldValue::from(" 30"));
        // date-shaped but not a real date
        assert_eq!(infer_form_value("2023-02-30".into()), FieldValue::from("2023-02-30"));
        // timezone suffix is outside the date pattern
        assert_eq!(
            infer_form_value("2024-05-02T08:15:00Z".into()),
            FieldValue::from("2024-05-02T08:15:00Z")
        );
    }

    #[test]
    fn test_numbers_beyond_i64_stay_floats() {
        assert_eq!(
            infer_form_value("9223372036854775808".into()),
            FieldValue::Float(9_223_372_036_854_775_808.0)
        );
        assert_eq!(
            infer_form_value("9223372036854775807".into()),
            FieldValue::Int(i64::MAX)
        );
    }

    #[test]
    fn test_blob_passes_through() {
        assert_eq!(
            infer_form_value(FormValue::Blob(vec![0x25, 0x50])),
            FieldValue::Binary(vec![0x25, 0x50])
        );
    }

    #[test]
    fn test_last_value_wins() {
        let value = form_fields_to_value([("nom", "A"), ("nom", "B")]);
        assert_eq!(value.as_object().unwrap().get("nom"), Some(&FieldValue::from("B")));
    }
}
