mod delete;
pub use delete::Delete;

mod find;
pub use find::Find;

mod insert;
pub use insert::Insert;

mod update;
pub use update::Update;

/// A document-level operation executed against one connection.
#[derive(Debug)]
pub enum Operation {
    /// Insert one or more documents into a collection.
    Insert(Insert),

    /// Find documents matching a filter.
    Find(Find),

    /// Update documents matching a filter.
    Update(Update),

    /// Delete documents matching a filter.
    Delete(Delete),
}
