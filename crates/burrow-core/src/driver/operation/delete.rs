use serde_json::Value;

#[derive(Debug)]
pub struct Delete {
    /// Collection to delete from.
    pub collection: String,

    /// Filter document selecting the records to delete.
    pub filter: Value,
}
