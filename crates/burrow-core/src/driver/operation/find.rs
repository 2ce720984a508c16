use serde_json::Value;

#[derive(Debug)]
pub struct Find {
    /// Collection to query.
    pub collection: String,

    /// Filter document; an empty object matches everything.
    pub filter: Value,

    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}
