pub mod context;
pub mod engine;
pub mod form_data;
pub mod primitive;

use once_cell::sync::Lazy;

use crate::error::ValidationError;
use crate::types::{FieldValue, Record, Schema};

pub use context::{FieldPath, PathSegment, ValidationContext};
pub use engine::SchemaValidationEngine;
pub use form_data::{FormValue, form_fields_to_value, infer_form_value};
pub use primitive::{PrimitiveValidator, is_valid_email, is_valid_url, parse_date};

static DEFAULT_ENGINE: Lazy<SchemaValidationEngine> = Lazy::new(SchemaValidationEngine::new);

/// Validate `data` against `schema` with the default engine configuration.
pub fn validate_data(schema: &Schema, data: impl Into<FieldValue>) -> Result<Record, ValidationError> {
    DEFAULT_ENGINE.validate(schema, &data.into())
}

/// Validate a flat form submission with the default engine configuration.
pub fn validate_form_data<I, K, V>(schema: &Schema, fields: I) -> Result<Record, ValidationError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FormValue>,
{
    DEFAULT_ENGINE.validate_form_data(schema, fields)
}
