use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// A named schema description loaded from exactly one definition file.
///
/// The model name comes from the declared `name` identifier, never from the
/// file name. Two definitions with the same name bound to the same connection
/// is a conflict, caught at compile time.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDefinition {
    /// Declared model name.
    pub name: String,

    /// Storage collection override. Defaults to the lowercased model name.
    #[serde(default)]
    pub collection: Option<String>,

    /// Field shapes, in declaration order.
    #[serde(default)]
    pub fields: IndexMap<String, FieldSpec>,
}

impl SchemaDefinition {
    /// Parses a JSON definition document, validating the declared name.
    pub fn from_json(src: &[u8]) -> crate::Result<Self> {
        let definition: SchemaDefinition =
            serde_json::from_slice(src).map_err(|err| crate::err!("{err}"))?;

        if definition.name.trim().is_empty() {
            crate::bail!("schema definition declares no model name");
        }

        Ok(definition)
    }

    /// Collection this model's documents live in.
    pub fn collection(&self) -> String {
        match &self.collection {
            Some(collection) => collection.clone(),
            None => self.name.to_lowercase(),
        }
    }
}

/// One field in a schema definition: either a bare type name or a detailed
/// shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// Shorthand form: `"age": "i64"`
    Ty(FieldType),

    /// Full form: `"age": { "type": "i64", "required": true }`
    Shape {
        #[serde(rename = "type")]
        ty: FieldType,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        default: Option<Value>,
    },
}

impl FieldSpec {
    pub fn ty(&self) -> FieldType {
        match self {
            FieldSpec::Ty(ty) => *ty,
            FieldSpec::Shape { ty, .. } => *ty,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            FieldSpec::Ty(_) => false,
            FieldSpec::Shape { required, .. } => *required,
        }
    }

    pub fn default_value(&self) -> Option<&Value> {
        match self {
            FieldSpec::Ty(_) => None,
            FieldSpec::Shape { default, .. } => default.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Bool,
    I64,
    F64,
    Timestamp,
    Object,
    Array,
}
