//! # Hospital Schema
//!
//! Declarative validation for the records of a hospital-management
//! application: establishments, services, beds, patients, staff and the
//! documents and movements attached to them.
//!
//! ## Features
//!
//! - **Schema algebra**: derive create, update, relation and reduced views from
//!   one base declaration per entity
//! - **Validation engine**: one pass reports every violation with its full path
//!   (`lits[0].numeroLit`), applies defaults and strips undeclared keys
//! - **Form adapter**: infers dates and numbers from flat text submissions
//! - **Catalog**: a shared, immutable registry of every entity schema
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hospital_schema::*;
//! use serde_json::json;
//!
//! # fn example() -> Result<()> {
//! let schema = catalog::schema(Entity::Patient, SchemaVariant::Create)
//!     .expect("every entity has a create schema");
//! let record = validate_data(
//!     &schema,
//!     json!({"nom": "Diallo", "prenom": "Awa", "dateNaissance": "1980-01-01"}),
//! )?;
//! assert_eq!(record["statut"], FieldValue::from("Active"));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use catalog::{Entity, EntitySchemas, SchemaCatalog, SchemaVariant};
pub use config::{UnknownFieldPolicy, ValidatorConfig};
pub use error::Result; // Our Result type takes precedence
pub use error::{FieldViolation, HospitalSchemaError, SchemaError, ValidationError, ViolationCode};
pub use types::*;
pub use validation::{
    FieldPath, FormValue, PathSegment, SchemaValidationEngine, ValidationContext,
    validate_data, validate_form_data,
};
