use serde_json::Value;

#[derive(Debug)]
pub struct Update {
    /// Collection to update.
    pub collection: String,

    /// Filter document selecting the records to update.
    pub filter: Value,

    /// Field/value pairs applied to every matching document.
    pub changes: Value,
}
