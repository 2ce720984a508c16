use crate::registry::ConnectionHandle;

use burrow_core::{
    driver::{operation, Operation, Response},
    err, Result, SchemaDefinition,
};

use serde_json::Value;
use std::sync::Arc;

/// Shared state between all `Model` clones.
struct Shared {
    definition: SchemaDefinition,
    collection: String,
    connection: ConnectionHandle,
}

/// A compiled, connection-bound model handle.
///
/// Supports document create/read/update/delete operations against its bound
/// connection. Cloning is cheap and shares the same underlying state; the
/// registry entry remains the canonical holder.
#[derive(Clone)]
pub struct Model {
    shared: Arc<Shared>,
}

impl Model {
    pub(crate) fn new(definition: SchemaDefinition, connection: ConnectionHandle) -> Self {
        let collection = definition.collection();
        Self {
            shared: Arc::new(Shared {
                definition,
                collection,
                connection,
            }),
        }
    }

    /// Declared model name.
    pub fn name(&self) -> &str {
        &self.shared.definition.name
    }

    /// Collection this model reads and writes.
    pub fn collection(&self) -> &str {
        &self.shared.collection
    }

    /// Schema definition this model was compiled from.
    pub fn definition(&self) -> &SchemaDefinition {
        &self.shared.definition
    }

    /// Connection this model is bound to.
    pub fn connection(&self) -> &ConnectionHandle {
        &self.shared.connection
    }

    /// Inserts one document.
    pub async fn create(&self, document: Value) -> Result<()> {
        self.exec(Operation::Insert(operation::Insert {
            collection: self.shared.collection.clone(),
            documents: vec![document],
        }))
        .await?;
        Ok(())
    }

    /// Inserts a batch of documents, returning the number inserted.
    pub async fn create_many(&self, documents: Vec<Value>) -> Result<u64> {
        let response = self
            .exec(Operation::Insert(operation::Insert {
                collection: self.shared.collection.clone(),
                documents,
            }))
            .await?;
        count_of(response)
    }

    /// Returns all documents matching `filter`.
    pub async fn find(&self, filter: Value) -> Result<Vec<Value>> {
        let response = self
            .exec(Operation::Find(operation::Find {
                collection: self.shared.collection.clone(),
                filter,
                limit: None,
            }))
            .await?;
        documents_of(response)
    }

    /// Returns the first document matching `filter`.
    pub async fn find_one(&self, filter: Value) -> Result<Option<Value>> {
        let response = self
            .exec(Operation::Find(operation::Find {
                collection: self.shared.collection.clone(),
                filter,
                limit: Some(1),
            }))
            .await?;
        Ok(documents_of(response)?.into_iter().next())
    }

    /// Applies `changes` to every document matching `filter`, returning the
    /// number updated.
    pub async fn update(&self, filter: Value, changes: Value) -> Result<u64> {
        let response = self
            .exec(Operation::Update(operation::Update {
                collection: self.shared.collection.clone(),
                filter,
                changes,
            }))
            .await?;
        count_of(response)
    }

    /// Deletes every document matching `filter`, returning the number removed.
    pub async fn delete(&self, filter: Value) -> Result<u64> {
        let response = self
            .exec(Operation::Delete(operation::Delete {
                collection: self.shared.collection.clone(),
                filter,
            }))
            .await?;
        count_of(response)
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        self.shared.connection.exec(op).await
    }
}

fn count_of(response: Response) -> Result<u64> {
    response
        .rows
        .into_count()
        .ok_or_else(|| err!("expected a count response"))
}

fn documents_of(response: Response) -> Result<Vec<Value>> {
    response
        .rows
        .into_documents()
        .ok_or_else(|| err!("expected a documents response"))
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name())
            .field("collection", &self.collection())
            .finish()
    }
}
