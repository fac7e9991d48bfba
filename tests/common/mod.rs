use hospital_schema::*;
use serde_json::{Value, json};
use std::sync::Arc;

#[allow(dead_code)]
pub fn catalog_schema(entity: Entity, variant: SchemaVariant) -> Arc<Schema> {
    SchemaCatalog::global()
        .schema(entity, variant)
        .unwrap_or_else(|| panic!("{entity} has no {variant} schema"))
}

#[allow(dead_code)]
pub fn valid_etablissement() -> Value {
    json!({
        "nom": "Hôpital Saint-Louis",
        "adresse": "1 avenue Claude Vellefaux",
        "ville": "Paris",
        "codePostal": "75010",
        "telephone": "0142499949",
        "email": "contact@saint-louis.example.fr",
        "siteWeb": "https://saint-louis.example.fr",
        "capacite": 650
    })
}

#[allow(dead_code)]
pub fn valid_patient() -> Value {
    json!({
        "nom": "Diallo",
        "prenom": "Awa",
        "dateNaissance": "1980-01-01",
        "sexe": "F",
        "email": "awa.diallo@example.org"
    })
}

#[allow(dead_code)]
pub fn valid_lit() -> Value {
    json!({
        "numeroLit": "A101",
        "serviceId": "507f1f77bcf86cd799439011"
    })
}

/// Small schema used by the form tests: `name`, `age`, `birthDate`.
#[allow(dead_code)]
pub fn person_schema() -> Schema {
    Schema::new("Person")
        .with_field(FieldDescriptor::string("name").min_length(1, "the name is required"))
        .with_field(FieldDescriptor::integer("age").non_negative())
        .with_field(FieldDescriptor::date("birthDate"))
}
