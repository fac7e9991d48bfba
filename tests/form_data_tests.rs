mod common;

use chrono::{TimeZone, Utc};
use common::*;
use hospital_schema::validation::infer_form_value;
use hospital_schema::*;
use pretty_assertions::assert_eq;

#[test]
fn test_form_inference_person() {
    let output = validate_form_data(
        &person_schema(),
        [("name", "John"), ("age", "30"), ("birthDate", "1990-01-01")],
    )
    .unwrap();

    assert_eq!(output["name"], FieldValue::from("John"));
    assert_eq!(output["age"], FieldValue::Int(30));
    assert_eq!(
        output["birthDate"],
        FieldValue::Date(Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_form_violations_are_aggregated() {
    let err = validate_form_data(
        &person_schema(),
        [("name", ""), ("age", "-3"), ("birthDate", "soon")],
    )
    .unwrap_err();

    assert_eq!(err.messages_at("name"), vec!["the name is required"]);
    assert_eq!(
        err.messages_at("age"),
        vec!["Number must be greater than or equal to 0"]
    );
    assert_eq!(err.messages_at("birthDate"), vec!["Invalid date"]);
}

#[test]
fn test_numeric_looking_text_becomes_a_number() {
    // inference runs before the schema is consulted
    let schema = catalog_schema(Entity::Etablissement, SchemaVariant::Create);
    let err = validate_form_data(
        &schema,
        [
            ("nom", "Hôpital Central"),
            ("adresse", "123 Avenue de la Santé"),
            ("telephone", "0123456789"),
            ("email", "contact@hopital.fr"),
        ],
    )
    .unwrap_err();
    assert_eq!(
        err.messages_at("telephone"),
        vec!["Expected string, received number"]
    );

    let output = validate_form_data(
        &schema,
        [
            ("nom", "Hôpital Central"),
            ("adresse", "123 Avenue de la Santé"),
            ("telephone", "+33 1 23 45 67 89"),
            ("email", "contact@hopital.fr"),
            ("capacite", "120"),
        ],
    )
    .unwrap();
    assert_eq!(output["capacite"], FieldValue::Int(120));
    assert_eq!(output["pays"], FieldValue::from("France"));
}

#[test]
fn test_form_files_pass_through() {
    let schema = catalog_schema(Entity::Document, SchemaVariant::Create);
    let pdf = b"%PDF-1.7".to_vec();
    let output = validate_form_data(
        &schema,
        [
            ("titre", FormValue::from("Compte rendu")),
            ("type", FormValue::from("pdf")),
            ("url", FormValue::from("https://docs.example.fr/cr.pdf")),
            ("patientId", FormValue::from("patient-7")),
            ("fichier", FormValue::Blob(pdf.clone())),
        ],
    )
    .unwrap();
    assert_eq!(output["fichier"], FieldValue::Binary(pdf));
}

#[test]
fn test_form_date_with_time() {
    let schema = catalog_schema(Entity::Transfert, SchemaVariant::Create);
    let output = validate_form_data(
        &schema,
        [
            ("patientId", "p-1"),
            ("serviceDepartId", "svc-a"),
            ("serviceArriveeId", "svc-b"),
            ("dateTransfert", "2024-05-02T08:15"),
        ],
    )
    .unwrap();
    assert_eq!(
        output["dateTransfert"],
        FieldValue::Date(Utc.with_ymd_and_hms(2024, 5, 2, 8, 15, 0).unwrap())
    );
    assert_eq!(output["statut"], FieldValue::from("En attente"));
}

#[test]
fn test_inference_is_schema_independent() {
    assert_eq!(infer_form_value("0042".into()), FieldValue::Int(42));
    assert_eq!(infer_form_value("12.50".into()), FieldValue::Float(12.5));
    assert_eq!(infer_form_value("B202".into()), FieldValue::from("B202"));
}
