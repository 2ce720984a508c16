mod definition;
pub use definition::{FieldSpec, FieldType, SchemaDefinition};
