mod builder;
pub use builder::Builder;

use crate::model::Model;

use burrow_core::driver::{Connection, Operation, ReadyState, Response};
use indexmap::IndexMap;
use std::sync::Arc;

/// Live handle to one database target.
///
/// Cloning shares the same underlying driver connection. The registry entry
/// for its key is the canonical holder; the connection is released when the
/// host shuts down or the registration aborts.
#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<dyn Connection>,
}

impl ConnectionHandle {
    pub(crate) fn new(connection: Box<dyn Connection>) -> Self {
        Self {
            inner: Arc::from(connection),
        }
    }

    pub fn host(&self) -> &str {
        self.inner.host()
    }

    pub fn port(&self) -> Option<u16> {
        self.inner.port()
    }

    pub fn database(&self) -> &str {
        self.inner.database()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.inner.ready_state()
    }

    pub(crate) async fn exec(&self, op: Operation) -> burrow_core::Result<Response> {
        self.inner.exec(op).await
    }

    pub(crate) async fn close(&self) -> burrow_core::Result<()> {
        self.inner.close().await
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("host", &self.host())
            .field("port", &self.port())
            .field("database", &self.database())
            .field("ready_state", &self.ready_state())
            .finish()
    }
}

/// One published entry: a connection and the models compiled for it.
#[derive(Debug)]
pub struct RegistryEntry {
    pub(crate) connection: ConnectionHandle,
    pub(crate) models: IndexMap<String, Model>,
}

impl RegistryEntry {
    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    /// Compiled models, keyed by declared name. Present but empty when no
    /// schema pattern matched.
    pub fn models(&self) -> &IndexMap<String, Model> {
        &self.models
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }
}

/// The published connection-and-model namespace.
///
/// Internally always the keyed map; [`Registry::view`] flattens the
/// single-connection form at the publication boundary.
pub struct Registry {
    entries: IndexMap<String, RegistryEntry>,
    single: bool,
}

impl Registry {
    /// Starts building a registry from a configuration.
    pub fn builder(config: crate::Config) -> Builder {
        Builder::new(config)
    }

    pub(crate) fn new(entries: IndexMap<String, RegistryEntry>, single: bool) -> Self {
        Self { entries, single }
    }

    /// Publication view: flattened for a single-connection configuration,
    /// keyed otherwise.
    pub fn view(&self) -> View<'_> {
        if self.single {
            View::Single(&self.entries[0])
        } else {
            View::Keyed(&self.entries)
        }
    }

    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Single-form convenience: the lone connection handle.
    pub fn connection(&self) -> Option<&ConnectionHandle> {
        match self.view() {
            View::Single(entry) => Some(entry.connection()),
            View::Keyed(_) => None,
        }
    }

    /// Single-form convenience: the lone entry's models.
    pub fn models(&self) -> Option<&IndexMap<String, Model>> {
        match self.view() {
            View::Single(entry) => Some(entry.models()),
            View::Keyed(_) => None,
        }
    }

    /// Closes every connection. Close failures are logged, not escalated;
    /// the registration is already being torn down.
    pub(crate) async fn close_all(&self) {
        for (key, entry) in &self.entries {
            if let Err(err) = entry.connection.close().await {
                tracing::warn!(key = %key, error = %err, "failed to release connection");
            }
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("single", &self.single)
            .finish()
    }
}

/// Published registry shape at the namespace boundary.
#[derive(Debug)]
pub enum View<'a> {
    /// Single-connection configuration: the entry's fields are exposed
    /// directly, with no key wrapper.
    Single(&'a RegistryEntry),

    /// Multi-connection configuration: entries keyed by derived key.
    Keyed(&'a IndexMap<String, RegistryEntry>),
}
