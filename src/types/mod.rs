pub mod derive;
pub mod field;
pub mod schema;
pub mod value;

pub use derive::{Relation, derive_create, derive_omit, derive_update, derive_with_relations};
pub use field::{Check, FieldDescriptor, FieldType, Rule};
pub use schema::{Schema, SchemaKind};
pub use value::{FieldValue, Record, record_to_json};
