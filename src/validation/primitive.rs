//! Scalar coercion and rule checks.
//!
//! Each scalar field type has one coercion routine that either produces the
//! normalized value or records a violation on the context. Rules (length and
//! sign constraints) are checked afterwards on the coerced value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::ValidationContext;
use crate::error::ViolationCode;
use crate::types::value::exact_i64;
use crate::types::{Check, FieldType, FieldValue, Rule};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse the date spellings accepted by date fields. Values without an offset
/// are taken as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Some(date_time.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|dt| dt.and_utc())
}

pub fn is_valid_email(input: &str) -> bool {
    !input.starts_with('.') && !input.contains("..") && EMAIL_REGEX.is_match(input)
}

pub fn is_valid_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

/// Coercion for every non-composite field type.
#[derive(Debug, Clone)]
pub struct PrimitiveValidator {
    coerce_dates: bool,
}

impl Default for PrimitiveValidator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PrimitiveValidator {
    pub fn new(coerce_dates: bool) -> Self {
        Self { coerce_dates }
    }

    /// Coerce `value` (never null) to `field_type`. Returns `None` after
    /// recording a violation.
    pub fn coerce(
        &self,
        field_type: &FieldType,
        value: &FieldValue,
        ctx: &mut ValidationContext,
    ) -> Option<FieldValue> {
        match field_type {
            FieldType::String => self.coerce_string(value, ctx).map(FieldValue::String),
            FieldType::Email => {
                let s = self.coerce_string(value, ctx)?;
                if is_valid_email(&s) {
                    Some(FieldValue::String(s))
                } else {
                    ctx.add_violation(ViolationCode::InvalidEmail, "Invalid email");
                    None
                }
            }
            FieldType::Url => {
                let s = self.coerce_string(value, ctx)?;
                if is_valid_url(&s) {
                    Some(FieldValue::String(s))
                } else {
                    ctx.add_violation(ViolationCode::InvalidUrl, "Invalid url");
                    None
                }
            }
            FieldType::Enum(options) => self.coerce_enum(options, value, ctx),
            FieldType::Integer => self.coerce_integer(value, ctx),
            FieldType::Number => self.coerce_number(value, ctx),
            FieldType::Boolean => match value {
                FieldValue::Bool(b) => Some(FieldValue::Bool(*b)),
                other => {
                    type_mismatch(ctx, "boolean", other);
                    None
                }
            },
            FieldType::Date => self.coerce_date(value, ctx),
            FieldType::Binary => match value {
                FieldValue::Binary(bytes) => Some(FieldValue::Binary(bytes.clone())),
                other => {
                    type_mismatch(ctx, "binary", other);
                    None
                }
            },
            FieldType::Object(_) | FieldType::Array(_) => {
                // composite types are walked by the engine
                type_mismatch(ctx, field_type.expected_kind(), value);
                None
            }
        }
    }

    fn coerce_string(&self, value: &FieldValue, ctx: &mut ValidationContext) -> Option<String> {
        match value {
            FieldValue::String(s) => Some(s.clone()),
            other => {
                type_mismatch(ctx, "string", other);
                None
            }
        }
    }

    fn coerce_enum(
        &self,
        options: &[String],
        value: &FieldValue,
        ctx: &mut ValidationContext,
    ) -> Option<FieldValue> {
        let s = self.coerce_string(value, ctx)?;
        if options.iter().any(|option| *option == s) {
            return Some(FieldValue::String(s));
        }
        let expected = options
            .iter()
            .map(|option| format!("'{option}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        ctx.add_violation(
            ViolationCode::InvalidEnum,
            format!("Invalid enum value. Expected {expected}, received '{s}'"),
        );
        None
    }

    fn coerce_integer(&self, value: &FieldValue, ctx: &mut ValidationContext) -> Option<FieldValue> {
        match value {
            FieldValue::Int(i) => Some(FieldValue::Int(*i)),
            FieldValue::Float(f) if f.is_nan() => {
                type_mismatch(ctx, "number", value);
                None
            }
            FieldValue::Float(f) => {
                if let Some(i) = exact_i64(*f) {
                    return Some(FieldValue::Int(i));
                }
                if f.is_finite() && f.fract() != 0.0 {
                    ctx.add_violation(ViolationCode::NotInteger, "Expected integer, received float");
                } else if *f < 0.0 {
                    ctx.add_violation(
                        ViolationCode::TooSmall,
                        format!("Number must be greater than or equal to {}", i64::MIN),
                    );
                } else {
                    ctx.add_violation(
                        ViolationCode::TooBig,
                        format!("Number must be less than or equal to {}", i64::MAX),
                    );
                }
                None
            }
            other => {
                type_mismatch(ctx, "number", other);
                None
            }
        }
    }

    fn coerce_number(&self, value: &FieldValue, ctx: &mut ValidationContext) -> Option<FieldValue> {
        match value {
            FieldValue::Int(i) => Some(FieldValue::Int(*i)),
            FieldValue::Float(f) if f.is_finite() => Some(FieldValue::Float(*f)),
            FieldValue::Float(f) if f.is_nan() => {
                type_mismatch(ctx, "number", value);
                None
            }
            FieldValue::Float(_) => {
                ctx.add_violation(ViolationCode::InvalidType, "Number must be finite");
                None
            }
            other => {
                type_mismatch(ctx, "number", other);
                None
            }
        }
    }

    fn coerce_date(&self, value: &FieldValue, ctx: &mut ValidationContext) -> Option<FieldValue> {
        let parsed = match value {
            FieldValue::Date(date) => return Some(FieldValue::Date(*date)),
            FieldValue::String(s) if self.coerce_dates => parse_date(s),
            FieldValue::Int(millis) if self.coerce_dates => {
                DateTime::<Utc>::from_timestamp_millis(*millis)
            }
            FieldValue::Float(millis) if self.coerce_dates && millis.is_finite() => {
                DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64)
            }
            FieldValue::Float(_) if self.coerce_dates => None,
            other => {
                type_mismatch(ctx, "date", other);
                return None;
            }
        };

        match parsed {
            Some(date) => Some(FieldValue::Date(date)),
            None => {
                ctx.add_violation(ViolationCode::InvalidDate, "Invalid date");
                None
            }
        }
    }

    /// Check rules against an already-coerced value. Rules that do not apply
    /// to the value's kind are ignored.
    pub fn apply_rules(&self, value: &FieldValue, rules: &[Rule], ctx: &mut ValidationContext) {
        for rule in rules {
            if let Some((code, default_message)) = self.check_rule(value, &rule.check) {
                let message = rule.message.clone().unwrap_or(default_message);
                ctx.add_violation(code, message);
            }
        }
    }

    fn check_rule(&self, value: &FieldValue, check: &Check) -> Option<(ViolationCode, String)> {
        match (check, value) {
            (Check::MinLength(min), FieldValue::String(s)) if s.trim().chars().count() < *min => {
                Some((
                    ViolationCode::TooSmall,
                    format!("String must contain at least {min} character(s)"),
                ))
            }
            (Check::MinLength(min), FieldValue::Array(items)) if items.len() < *min => Some((
                ViolationCode::TooSmall,
                format!("Array must contain at least {min} element(s)"),
            )),
            (Check::MaxLength(max), FieldValue::String(s)) if s.chars().count() > *max => Some((
                ViolationCode::TooBig,
                format!("String must contain at most {max} character(s)"),
            )),
            (Check::MaxLength(max), FieldValue::Array(items)) if items.len() > *max => Some((
                ViolationCode::TooBig,
                format!("Array must contain at most {max} element(s)"),
            )),
            (Check::NonNegative, v) if v.as_f64().is_some_and(|n| n < 0.0) => Some((
                ViolationCode::TooSmall,
                "Number must be greater than or equal to 0".to_string(),
            )),
            (Check::Positive, v) if v.as_f64().is_some_and(|n| n <= 0.0) => Some((
                ViolationCode::TooSmall,
                "Number must be greater than 0".to_string(),
            )),
            _ => None,
        }
    }
}

fn type_mismatch(ctx: &mut ValidationContext, expected: &str, received: &FieldValue) {
    ctx.add_violation(
        ViolationCode::InvalidType,
        format!("Expected {expected}, received {}", received.kind()),
    );
}
