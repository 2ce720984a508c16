use serde_json::Value;

#[derive(Debug)]
pub struct Insert {
    /// Collection receiving the documents.
    pub collection: String,

    /// Documents to insert.
    pub documents: Vec<Value>,
}
