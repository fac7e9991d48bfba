//! Schema algebra.
//!
//! Every entity is declared once as a base schema; the create, update,
//! with-relations and reduced views are computed from it:
//!
//! - [`derive_create`] drops the identifier field,
//! - [`derive_update`] makes the identifier mandatory and everything else
//!   optional, without defaults,
//! - [`derive_with_relations`] adds optional nested entities or collections,
//! - [`derive_omit`] removes named fields, which is how mutually referencing
//!   entities avoid an infinite schema.
//!
//! Derivation never mutates its input and fails at construction time when it
//! is misused.

use std::sync::Arc;

use super::{FieldDescriptor, FieldType, Schema, SchemaKind};
use crate::error::SchemaError;

/// Target of a relation field.
#[derive(Debug, Clone)]
pub enum Relation {
    /// A single nested entity. Absent or `null` when there is none.
    One(Arc<Schema>),
    /// An ordered collection of nested entities.
    Many(Arc<Schema>),
}

impl Relation {
    pub fn one(schema: impl Into<Arc<Schema>>) -> Self {
        Relation::One(schema.into())
    }

    pub fn many(schema: impl Into<Arc<Schema>>) -> Self {
        Relation::Many(schema.into())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        match self {
            Relation::One(schema) | Relation::Many(schema) => schema,
        }
    }

    fn into_field(self, name: String) -> FieldDescriptor {
        match self {
            Relation::One(schema) => FieldDescriptor::object(name, schema).nullish(),
            Relation::Many(schema) => {
                FieldDescriptor::array(name, FieldType::Object(schema)).optional()
            }
        }
    }
}

/// The schema accepted when creating a record: no identifier at all.
///
/// An identifier supplied in the input is then an unknown key and is handled by
/// the engine's unknown-field policy (stripped by default).
pub fn derive_create(schema: &Schema) -> Schema {
    let mut derived = schema.clone();
    derived.name = format!("{}Create", schema.name);
    derived.kind = SchemaKind::Create;
    if let Some(identifier) = derived.identifier.take() {
        derived.fields.shift_remove(&identifier);
    }
    derived
}

/// The schema accepted for partial updates.
///
/// The identifier becomes required and non-nullable; every other field becomes
/// optional and loses its default, so omitted fields stay omitted.
pub fn derive_update(schema: &Schema) -> Result<Schema, SchemaError> {
    let identifier = schema
        .identifier
        .clone()
        .ok_or_else(|| SchemaError::missing_identifier(&schema.name))?;

    let mut derived = schema.clone();
    derived.name = format!("{}Update", schema.name);
    derived.kind = SchemaKind::Update;
    for (name, field) in derived.fields.iter_mut() {
        field.default = None;
        if *name == identifier {
            field.required = true;
            field.nullable = false;
        } else {
            field.required = false;
        }
    }

    tracing::trace!(schema = %derived.name, identifier = %identifier, "derived update schema");
    Ok(derived)
}

/// Extend a schema with optional relation fields.
pub fn derive_with_relations<I, K>(schema: &Schema, relations: I) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = (K, Relation)>,
    K: Into<String>,
{
    let mut derived = schema.clone();
    derived.name = format!("{}WithRelations", schema.name);
    derived.kind = SchemaKind::WithRelations;

    let mut added = 0usize;
    for (name, relation) in relations {
        let name = name.into();
        if derived.fields.contains_key(&name) {
            return Err(SchemaError::relation_conflict(&schema.name, name));
        }
        tracing::trace!(
            schema = %derived.name,
            relation = %name,
            target = %relation.schema().name(),
            "adding relation"
        );
        derived.fields.insert(name.clone(), relation.into_field(name));
        added += 1;
    }

    if added == 0 {
        return Err(SchemaError::empty_relations(&schema.name));
    }
    Ok(derived)
}

/// A reduced copy of `schema` without the named fields, named after what it
/// lacks (`EtablissementWithRelations` minus `services` is
/// `EtablissementWithRelationsWithoutServices`).
pub fn derive_omit(schema: &Schema, fields: &[&str]) -> Result<Schema, SchemaError> {
    let mut derived = schema.clone();
    derived.kind = SchemaKind::Reduced;
    derived.name = fields.iter().fold(
        format!("{}Without", schema.name),
        |mut name, field| {
            let mut chars = field.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_uppercase());
                name.push_str(chars.as_str());
            }
            name
        },
    );
    for field in fields {
        if derived.fields.shift_remove(*field).is_none() {
            return Err(SchemaError::unknown_field(&schema.name, *field));
        }
        if derived.identifier.as_deref() == Some(*field) {
            derived.identifier = None;
        }
    }
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;

    fn service() -> Schema {
        Schema::new("Service")
            .with_identifier("id")
            .with_field(FieldDescriptor::string("nom").min_length(1, "the name is required"))
            .with_field(FieldDescriptor::integer("capacite").non_negative().with_default(0i64))
    }

    #[test]
    fn test_create_removes_identifier() {
        let create = derive_create(&service());
        assert!(!create.contains_field("id"));
        assert_eq!(create.identifier(), None);
        assert_eq!(create.kind(), SchemaKind::Create);
        assert_eq!(create.name(), "ServiceCreate");
        // defaults survive on create
        assert_eq!(
            create.field("capacite").unwrap().default,
            Some(FieldValue::Int(0))
        );
    }

    #[test]
    fn test_update_flips_required_flags_and_drops_defaults() {
        let update = derive_update(&service()).unwrap();
        let id = update.field("id").unwrap();
        assert!(id.required);
        assert!(!id.nullable);
        assert!(!update.field("nom").unwrap().required);
        assert!(update.field("capacite").unwrap().default.is_none());
        assert_eq!(update.kind(), SchemaKind::Update);
    }

    #[test]
    fn test_update_without_identifier_is_refused() {
        let schema = derive_create(&service());
        assert_eq!(
            derive_update(&schema).unwrap_err(),
            SchemaError::missing_identifier("ServiceCreate")
        );
    }

    #[test]
    fn test_derivation_leaves_input_untouched() {
        let base = service();
        let _ = derive_update(&base).unwrap();
        let _ = derive_create(&base);
        assert!(base.contains_field("id"));
        assert!(base.field("nom").unwrap().required);
    }

    #[test]
    fn test_with_relations_adds_optional_fields() {
        let lit = Arc::new(Schema::new("Lit").with_field(FieldDescriptor::string("numeroLit")));
        let derived =
            derive_with_relations(&service(), [("lits", Relation::many(lit.clone()))]).unwrap();
        let field = derived.field("lits").unwrap();
        assert!(!field.required);
        assert!(matches!(field.field_type, FieldType::Array(_)));
        assert_eq!(derived.name(), "ServiceWithRelations");

        let one = derive_with_relations(&service(), [("lit", Relation::one(lit))]).unwrap();
        let field = one.field("lit").unwrap();
        assert!(field.nullable);
        assert!(matches!(field.field_type, FieldType::Object(_)));
    }

    #[test]
    fn test_with_relations_rejects_conflicts_and_empty_sets() {
        let target = Arc::new(Schema::new("Other"));
        assert!(matches!(
            derive_with_relations(&service(), [("nom", Relation::one(target))]),
            Err(SchemaError::RelationConflict { .. })
        ));
        let none: Vec<(String, Relation)> = Vec::new();
        assert!(matches!(
            derive_with_relations(&service(), none),
            Err(SchemaError::EmptyRelations { .. })
        ));
    }

    #[test]
    fn test_omit() {
        let reduced = derive_omit(&service(), &["capacite"]).unwrap();
        assert!(!reduced.contains_field("capacite"));
        assert_eq!(reduced.kind(), SchemaKind::Reduced);
        assert!(derive_omit(&service(), &["missing"]).is_err());

        let without_id = derive_omit(&service(), &["id"]).unwrap();
        assert_eq!(without_id.identifier(), None);
    }

    #[test]
    fn test_omit_names_the_reduced_schema() {
        assert_eq!(
            derive_omit(&service(), &["capacite"]).unwrap().name(),
            "ServiceWithoutCapacite"
        );
        assert_eq!(
            derive_omit(&service(), &["nom", "capacite"]).unwrap().name(),
            "ServiceWithoutNomCapacite"
        );
    }
}
