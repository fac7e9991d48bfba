use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::validation::FieldPath;

/// Crate-level error wrapping every failure the library and CLI can produce.
#[derive(Error, Debug)]
pub enum HospitalSchemaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown entity: {name}")]
    UnknownEntity { name: String },

    #[error("Unknown schema variant: {name}")]
    UnknownVariant { name: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HospitalSchemaError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::UnknownEntity { name: name.into() }
    }

    pub fn unknown_variant(name: impl Into<String>) -> Self {
        Self::UnknownVariant { name: name.into() }
    }
}

/// Misuse of the schema algebra. Raised while schemas are being built, never
/// while data is being validated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Cannot derive an update schema from '{schema}': it has no identifier field")]
    MissingIdentifier { schema: String },

    #[error("Schema '{schema}' has no field named '{field}'")]
    UnknownField { schema: String, field: String },

    #[error("Relation '{field}' collides with an existing field of '{schema}'")]
    RelationConflict { schema: String, field: String },

    #[error("No relations given when extending '{schema}'")]
    EmptyRelations { schema: String },

    #[error("Invalid declaration in '{schema}': {message}")]
    InvalidDeclaration { schema: String, message: String },
}

impl SchemaError {
    pub fn missing_identifier(schema: impl Into<String>) -> Self {
        Self::MissingIdentifier {
            schema: schema.into(),
        }
    }

    pub fn unknown_field(schema: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            schema: schema.into(),
            field: field.into(),
        }
    }

    pub fn relation_conflict(schema: impl Into<String>, field: impl Into<String>) -> Self {
        Self::RelationConflict {
            schema: schema.into(),
            field: field.into(),
        }
    }

    pub fn empty_relations(schema: impl Into<String>) -> Self {
        Self::EmptyRelations {
            schema: schema.into(),
        }
    }

    pub fn invalid_declaration(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            schema: schema.into(),
            message: message.into(),
        }
    }
}

/// Machine-readable category of a field violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationCode {
    Required,
    InvalidType,
    InvalidDate,
    InvalidEmail,
    InvalidUrl,
    InvalidEnum,
    NotInteger,
    TooSmall,
    TooBig,
    UnknownField,
    TooDeep,
}

/// A single failed check on a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub path: FieldPath,
    pub code: ViolationCode,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: FieldPath, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            path,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found by one validation call, raised as one error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub schema: String,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(schema: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        Self {
            schema: schema.into(),
            violations,
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether any violation is reported at the given rendered path
    /// (e.g. `"email"` or `"lits[0].numeroLit"`).
    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path.to_string() == path)
    }

    /// Messages reported at the given rendered path, in discovery order.
    pub fn messages_at(&self, path: &str) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|v| v.path.to_string() == path)
            .map(|v| v.message.as_str())
            .collect()
    }

    /// Transport payload: `{"schema": .., "violations": [{path, code, message}]}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "schema": self.schema,
            "violations": self
                .violations
                .iter()
                .map(|v| serde_json::json!({
                    "path": v.path.to_string(),
                    "code": v.code,
                    "message": v.message,
                }))
                .collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validation failed for {} ({} violation{})",
            self.schema,
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

pub type Result<T> = std::result::Result<T, HospitalSchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::PathSegment;

    fn violation(path: &[&str], message: &str) -> FieldViolation {
        let path = path
            .iter()
            .map(|s| PathSegment::Key((*s).to_string()))
            .collect::<FieldPath>();
        FieldViolation::new(path, ViolationCode::Required, message)
    }

    #[test]
    fn test_display_lists_every_violation() {
        let err = ValidationError::new(
            "Patient",
            vec![violation(&["nom"], "Required"), violation(&["email"], "Invalid email")],
        );
        let message = err.to_string();
        assert!(message.contains("Patient"));
        assert!(message.contains("2 violations"));
        assert!(message.contains("nom: Required"));
        assert!(message.contains("email: Invalid email"));
    }

    #[test]
    fn test_to_json_payload() {
        let err = ValidationError::new("Lit", vec![violation(&["id"], "Required")]);
        let payload = err.to_json();
        assert_eq!(payload["schema"], "Lit");
        assert_eq!(payload["violations"][0]["path"], "id");
        assert_eq!(payload["violations"][0]["code"], "required");
        assert_eq!(payload["violations"][0]["message"], "Required");
    }

    #[test]
    fn test_lookup_by_path() {
        let err = ValidationError::new(
            "Etablissement",
            vec![violation(&["email"], "Invalid email")],
        );
        assert!(err.has_violation_at("email"));
        assert!(!err.has_violation_at("nom"));
        assert_eq!(err.messages_at("email"), vec!["Invalid email"]);
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::missing_identifier("Medicament");
        assert!(err.to_string().contains("Medicament"));
        assert!(err.to_string().contains("identifier"));
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: HospitalSchemaError = json_err.into();
        assert!(matches!(err, HospitalSchemaError::Serialization(_)));
    }
}
