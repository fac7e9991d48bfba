use serde::de::DeserializeOwned;

use super::{PrimitiveValidator, ValidationContext};
use crate::config::{UnknownFieldPolicy, ValidatorConfig};
use crate::error::{FieldViolation, ValidationError, ViolationCode};
use crate::types::{FieldDescriptor, FieldType, FieldValue, Record, Schema, record_to_json};

/// Interprets schemas against untyped input.
///
/// The engine holds only its configuration, so one instance can be shared by
/// any number of threads and reused for any schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidationEngine {
    config: ValidatorConfig,
    primitives: PrimitiveValidator,
}

impl SchemaValidationEngine {
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            primitives: PrimitiveValidator::new(config.coerce_dates),
            config,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `data` against `schema`.
    ///
    /// On success the returned record holds exactly the declared fields that
    /// were present or defaulted, coerced to their types. On failure every
    /// violation found is returned at once.
    pub fn validate(&self, schema: &Schema, data: &FieldValue) -> Result<Record, ValidationError> {
        let mut ctx = ValidationContext::new();
        let record = self.validate_object(schema, data, &mut ctx, 0);

        if ctx.has_violations() {
            let violations = ctx.into_violations();
            tracing::debug!(
                schema = %schema.name(),
                violations = violations.len(),
                "validation failed"
            );
            return Err(ValidationError::new(schema.name(), violations));
        }

        tracing::trace!(schema = %schema.name(), "validation succeeded");
        Ok(record.unwrap_or_default())
    }

    pub fn validate_json(
        &self,
        schema: &Schema,
        data: &serde_json::Value,
    ) -> Result<Record, ValidationError> {
        self.validate(schema, &FieldValue::from(data))
    }

    /// Validate, then deserialize the validated record into `T`.
    ///
    /// Dates reach `T` as RFC 3339 strings, which `chrono`'s serde support
    /// reads back into `DateTime<Utc>`.
    pub fn validate_into<T: DeserializeOwned>(
        &self,
        schema: &Schema,
        data: &serde_json::Value,
    ) -> crate::Result<T> {
        let record = self.validate_json(schema, data)?;
        Ok(serde_json::from_value(record_to_json(&record))?)
    }

    /// Violations `value` would produce as the value of `field`.
    pub fn check_field(&self, field: &FieldDescriptor, value: &FieldValue) -> Vec<FieldViolation> {
        let mut ctx = ValidationContext::new();
        ctx.push_key(&field.name);
        let _ = self.validate_present(field, value, &mut ctx, 0);
        ctx.into_violations()
    }

    fn validate_object(
        &self,
        schema: &Schema,
        value: &FieldValue,
        ctx: &mut ValidationContext,
        depth: usize,
    ) -> Option<Record> {
        let FieldValue::Object(input) = value else {
            ctx.add_violation(
                ViolationCode::InvalidType,
                format!("Expected object, received {}", value.kind()),
            );
            return None;
        };

        let mut output = Record::with_capacity(schema.len());
        for field in schema.fields() {
            ctx.push_key(&field.name);
            match input.get(&field.name) {
                None => {
                    if let Some(default) = &field.default {
                        output.insert(field.name.clone(), default.clone());
                    } else if field.required {
                        ctx.add_violation(ViolationCode::Required, "Required");
                    }
                }
                Some(value) => {
                    if let Some(coerced) = self.validate_present(field, value, ctx, depth) {
                        output.insert(field.name.clone(), coerced);
                    }
                }
            }
            ctx.pop();
        }

        for key in input.keys().filter(|key| !schema.contains_field(key)) {
            match self.config.unknown_fields {
                UnknownFieldPolicy::Strip => {
                    tracing::trace!(schema = %schema.name(), key = %key, "stripping unknown key");
                }
                UnknownFieldPolicy::Reject => {
                    ctx.push_key(key);
                    ctx.add_violation(
                        ViolationCode::UnknownField,
                        format!("Unrecognized key '{key}'"),
                    );
                    ctx.pop();
                }
            }
        }

        Some(output)
    }

    fn validate_present(
        &self,
        field: &FieldDescriptor,
        value: &FieldValue,
        ctx: &mut ValidationContext,
        depth: usize,
    ) -> Option<FieldValue> {
        if value.is_null() {
            if field.nullable {
                return Some(FieldValue::Null);
            }
            ctx.add_violation(
                ViolationCode::InvalidType,
                format!("Expected {}, received null", field.field_type.expected_kind()),
            );
            return None;
        }

        let coerced = self.validate_value(&field.field_type, value, ctx, depth)?;
        let before = ctx.violation_count();
        self.primitives.apply_rules(&coerced, &field.rules, ctx);
        (ctx.violation_count() == before).then_some(coerced)
    }

    fn validate_value(
        &self,
        field_type: &FieldType,
        value: &FieldValue,
        ctx: &mut ValidationContext,
        depth: usize,
    ) -> Option<FieldValue> {
        match field_type {
            FieldType::Object(schema) => {
                if !self.enter(ctx, depth) {
                    return None;
                }
                self.validate_object(schema, value, ctx, depth + 1)
                    .map(FieldValue::Object)
            }
            FieldType::Array(item_type) => {
                let FieldValue::Array(items) = value else {
                    ctx.add_violation(
                        ViolationCode::InvalidType,
                        format!("Expected array, received {}", value.kind()),
                    );
                    return None;
                };
                if !self.enter(ctx, depth) {
                    return None;
                }

                let mut output = Vec::with_capacity(items.len());
                let mut valid = true;
                for (index, item) in items.iter().enumerate() {
                    ctx.push_index(index);
                    if item.is_null() {
                        ctx.add_violation(
                            ViolationCode::InvalidType,
                            format!("Expected {}, received null", item_type.expected_kind()),
                        );
                        valid = false;
                    } else {
                        match self.validate_value(item_type, item, ctx, depth + 1) {
                            Some(coerced) => output.push(coerced),
                            None => valid = false,
                        }
                    }
                    ctx.pop();
                }
                valid.then_some(FieldValue::Array(output))
            }
            scalar => self.primitives.coerce(scalar, value, ctx),
        }
    }

    fn enter(&self, ctx: &mut ValidationContext, depth: usize) -> bool {
        if depth >= self.config.max_depth {
            ctx.add_violation(
                ViolationCode::TooDeep,
                format!("Nesting exceeds {} levels", self.config.max_depth),
            );
            return false;
        }
        true
    }
}
