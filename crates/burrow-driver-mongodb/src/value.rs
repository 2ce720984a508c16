use bson::{Bson, Document};
use burrow_core::{err, Result};
use serde_json::Value;

pub(crate) fn to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(v) => Bson::Boolean(*v),
        Value::Number(v) => {
            if let Some(i) = v.as_i64() {
                Bson::Int64(i)
            } else if let Some(u) = v.as_u64() {
                if u <= i64::MAX as u64 {
                    Bson::Int64(u as i64)
                } else {
                    Bson::String(u.to_string())
                }
            } else {
                Bson::Double(v.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(v) => Bson::String(v.clone()),
        Value::Array(values) => Bson::Array(values.iter().map(to_bson).collect()),
        Value::Object(map) => {
            let mut doc = Document::new();
            for (key, value) in map {
                doc.insert(key.clone(), to_bson(value));
            }
            Bson::Document(doc)
        }
    }
}

pub(crate) fn to_document(value: &Value) -> Result<Document> {
    match to_bson(value) {
        Bson::Document(doc) => Ok(doc),
        _ => Err(err!("expected a JSON object, got {value}")),
    }
}

pub(crate) fn from_bson(bson: &Bson) -> Value {
    match bson {
        Bson::Null => Value::Null,
        Bson::Boolean(v) => Value::Bool(*v),
        Bson::Int32(v) => Value::from(*v),
        Bson::Int64(v) => Value::from(*v),
        Bson::Double(v) => serde_json::Number::from_f64(*v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::String(v) => Value::String(v.clone()),
        Bson::Array(values) => Value::Array(values.iter().map(from_bson).collect()),
        Bson::Document(doc) => from_document(doc),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        // Remaining BSON-only types round through the relaxed extended JSON
        // representation.
        other => other.clone().into_relaxed_extjson(),
    }
}

pub(crate) fn from_document(doc: &Document) -> Value {
    let mut map = serde_json::Map::with_capacity(doc.len());
    for (key, value) in doc {
        map.insert(key.clone(), from_bson(value));
    }
    Value::Object(map)
}
