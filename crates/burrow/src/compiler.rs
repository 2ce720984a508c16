use crate::{model::Model, registry::ConnectionHandle};

use burrow_core::{Error, Result, SchemaDefinition};
use indexmap::IndexMap;

/// Compiles resolved definitions into models bound to `connection`.
///
/// Binding happens here and nowhere else, so a model can never end up bound
/// to a connection other than its entry's. A duplicate declared name within
/// one connection's scope is a conflict; the map carries no ordering
/// guarantee beyond key uniqueness.
pub(crate) fn compile(
    key: &str,
    definitions: Vec<SchemaDefinition>,
    connection: &ConnectionHandle,
) -> Result<IndexMap<String, Model>> {
    let mut models = IndexMap::with_capacity(definitions.len());

    for definition in definitions {
        let name = definition.name.clone();
        if models.contains_key(&name) {
            return Err(Error::model_conflict(name, key));
        }
        models.insert(name, Model::new(definition, connection.clone()));
    }

    Ok(models)
}
