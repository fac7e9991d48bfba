use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use std::fmt;

use super::FieldDescriptor;
use crate::error::SchemaError;
use crate::validation::SchemaValidationEngine;

/// How a schema came to be. Informational; validation treats all kinds alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaKind {
    Base,
    Create,
    Update,
    WithRelations,
    Reduced,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaKind::Base => "base",
            SchemaKind::Create => "create",
            SchemaKind::Update => "update",
            SchemaKind::WithRelations => "withRelations",
            SchemaKind::Reduced => "reduced",
        };
        f.write_str(name)
    }
}

/// An immutable, ordered set of field descriptors.
///
/// Schemas are plain data: the derivation functions in [`super::derive`] build
/// new schemas from existing ones and the validation engine interprets them.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) name: String,
    pub(crate) kind: SchemaKind,
    pub(crate) identifier: Option<String>,
    pub(crate) fields: IndexMap<String, FieldDescriptor>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaKind::Base,
            identifier: None,
            fields: IndexMap::new(),
        }
    }

    /// Declare the identifier field: an optional, opaque string placed first.
    pub fn with_identifier(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.fields.contains_key(&name) {
            self.fields
                .shift_insert(0, name.clone(), FieldDescriptor::string(name.clone()).optional());
        }
        self.identifier = Some(name);
        self
    }

    /// Add a field. A later field with the same name replaces the earlier one.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the declaration itself: names, identifier, enum options and
    /// that every declared default satisfies its own field.
    pub fn validate_structure(&self) -> Result<(), SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::invalid_declaration(
                "<unnamed>",
                "schema name cannot be empty",
            ));
        }

        if let Some(identifier) = &self.identifier {
            if !self.fields.contains_key(identifier) {
                return Err(SchemaError::unknown_field(&self.name, identifier));
            }
        }

        let engine = SchemaValidationEngine::new();
        for (key, field) in &self.fields {
            if key.is_empty() {
                return Err(SchemaError::invalid_declaration(
                    &self.name,
                    "field name cannot be empty",
                ));
            }
            if key != &field.name {
                return Err(SchemaError::invalid_declaration(
                    &self.name,
                    format!("field '{key}' is declared under the name '{}'", field.name),
                ));
            }
            if let super::FieldType::Enum(options) = &field.field_type {
                if options.is_empty() {
                    return Err(SchemaError::invalid_declaration(
                        &self.name,
                        format!("enum field '{key}' has no options"),
                    ));
                }
            }
            if let Some(default) = &field.default {
                let violations = engine.check_field(field, default);
                if let Some(violation) = violations.first() {
                    return Err(SchemaError::invalid_declaration(
                        &self.name,
                        format!("default of '{key}' is invalid: {}", violation.message),
                    ));
                }
            }
        }

        Ok(())
    }

    /// JSON description of the schema, nested schemas included.
    pub fn describe(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.describe()))
            .collect();
        json!({
            "name": self.name,
            "kind": self.kind,
            "identifier": self.identifier,
            "fields": fields,
        })
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema({}) [{}]", self.name, self.kind)?;
        if let Some(identifier) = &self.identifier {
            write!(f, " id={identifier}")?;
        }
        Ok(())
    }
}
