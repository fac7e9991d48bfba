mod common;

use common::*;
use hospital_schema::*;
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn test_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Schema>();
    assert_send_sync::<SchemaCatalog>();
    assert_send_sync::<SchemaValidationEngine>();
    assert_send_sync::<ValidationError>();
    assert_send_sync::<HospitalSchemaError>();
}

#[test]
fn test_multithreaded_validation() {
    let schema = catalog_schema(Entity::Lit, SchemaVariant::Create);
    let engine = Arc::new(SchemaValidationEngine::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let schema = Arc::clone(&schema);
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let input = json!({"numeroLit": format!("A{i}"), "serviceId": "svc-1"});
                engine.validate_json(&schema, &input)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let record = handle.join().unwrap().unwrap();
        assert_eq!(record["numeroLit"], FieldValue::from(format!("A{i}")));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_share_the_catalog() {
    let mut tasks = Vec::new();
    for i in 0..32 {
        tasks.push(tokio::spawn(async move {
            let schema = catalog_schema(Entity::Etablissement, SchemaVariant::Create);
            let mut input = valid_etablissement();
            if i % 2 == 1 {
                input["email"] = json!("not-an-email");
            }
            validate_data(&schema, input)
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let outcome = task.await.unwrap();
        if i % 2 == 1 {
            assert!(outcome.unwrap_err().has_violation_at("email"));
        } else {
            assert_eq!(outcome.unwrap()["capacite"], FieldValue::Int(650));
        }
    }
}
