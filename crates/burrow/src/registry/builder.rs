use super::{ConnectionHandle, Registry, RegistryEntry};
use crate::{
    compiler, connect,
    config::{Config, ConnectionSpec},
    resolver,
};

use burrow_core::{driver::Driver, err, Error, Result, SchemaDefinition};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Registration state machine.
///
/// `Idle → Normalizing → Connecting → Resolving → Compiling → Published`;
/// a failure at any stage moves to `Failed` and releases every connection
/// opened so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Normalizing,
    Connecting,
    Resolving,
    Compiling,
    Published,
    Failed,
}

/// Builds a [`Registry`] from a [`Config`].
///
/// Obtained from [`Registry::builder`]; registration runs through
/// [`crate::App::register_with`] so the host can guard the namespace.
pub struct Builder {
    config: Config,
    driver: Option<Box<dyn Driver>>,
    schema_root: PathBuf,
    connect_timeout: Option<Duration>,
}

impl Builder {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            driver: None,
            schema_root: PathBuf::from("."),
            connect_timeout: None,
        }
    }

    /// Replaces the built-in scheme dispatch with a custom driver.
    pub fn driver(mut self, driver: impl Driver) -> Self {
        self.driver = Some(Box::new(driver));
        self
    }

    /// Root directory schema patterns resolve against. Defaults to the
    /// process working directory.
    pub fn schema_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.schema_root = root.into();
        self
    }

    /// Bounds each connection attempt. Absent, a hung driver connect blocks
    /// registration indefinitely.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Runs the registration sequence to completion.
    ///
    /// All-or-nothing: every spec must connect, resolve, and compile, or the
    /// whole operation fails and nothing is published.
    pub(crate) async fn build(self) -> Result<Registry> {
        let single = self.config.is_single();
        let mut phase = Phase::Idle;

        transition(&mut phase, Phase::Normalizing);
        let specs = match self.config.normalize() {
            Ok(specs) => specs,
            Err(error) => return fail(&mut phase, vec![], error).await,
        };

        let driver: Arc<dyn Driver> = match self.driver {
            Some(driver) => Arc::from(driver),
            None => Arc::new(connect::Connect::new()),
        };

        transition(&mut phase, Phase::Connecting);
        let connections = match connect_all(&driver, &specs, self.connect_timeout).await {
            Ok(connections) => connections,
            Err((opened, error)) => return fail(&mut phase, opened, error).await,
        };

        transition(&mut phase, Phase::Resolving);
        let mut resolved = Vec::with_capacity(specs.len());
        for spec in &specs {
            match resolve_one(&self.schema_root, spec).await {
                Ok(definitions) => resolved.push(definitions),
                Err(error) => return fail(&mut phase, connections, error).await,
            }
        }

        transition(&mut phase, Phase::Compiling);
        let mut entries = IndexMap::with_capacity(specs.len());
        for (index, (spec, definitions)) in specs.iter().zip(resolved).enumerate() {
            let connection = connections[index].clone();
            match compiler::compile(&spec.key, definitions, &connection) {
                Ok(models) => {
                    entries.insert(spec.key.clone(), RegistryEntry { connection, models });
                }
                Err(error) => return fail(&mut phase, connections, error).await,
            }
        }

        transition(&mut phase, Phase::Published);
        tracing::info!(
            keys = ?entries.keys().collect::<Vec<_>>(),
            "registry assembled"
        );
        Ok(Registry::new(entries, single))
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("schema_root", &self.schema_root)
            .field("connect_timeout", &self.connect_timeout)
            .field("custom_driver", &self.driver.is_some())
            .finish()
    }
}

fn transition(phase: &mut Phase, next: Phase) {
    tracing::debug!(from = ?phase, to = ?next, "registration phase");
    *phase = next;
}

/// Releases every opened connection and returns the failure.
///
/// A release failure is logged, not escalated; the registration has already
/// failed.
async fn fail<T>(phase: &mut Phase, opened: Vec<ConnectionHandle>, error: Error) -> Result<T> {
    transition(phase, Phase::Failed);

    for connection in &opened {
        if let Err(close_error) = connection.close().await {
            tracing::warn!(
                host = connection.host(),
                error = %close_error,
                "failed to release connection on abort"
            );
        }
    }

    Err(error)
}

/// Connects every spec concurrently.
///
/// Independent specs share no mutable state. Each attempt runs to completion
/// even when a sibling fails; nothing is cancelled mid-flight. On failure,
/// returns every successfully opened handle for release, along with the
/// error belonging to the earliest spec in configuration order.
async fn connect_all(
    driver: &Arc<dyn Driver>,
    specs: &[ConnectionSpec],
    timeout: Option<Duration>,
) -> std::result::Result<Vec<ConnectionHandle>, (Vec<ConnectionHandle>, Error)> {
    let mut join_set = JoinSet::new();

    for (index, spec) in specs.iter().enumerate() {
        let driver = driver.clone();
        let spec = spec.clone();
        join_set.spawn(async move {
            let result = connect::establish(&*driver, &spec, timeout).await;
            (index, spec, result)
        });
    }

    let mut handles: Vec<Option<ConnectionHandle>> = (0..specs.len()).map(|_| None).collect();
    let mut first_failure: Option<(usize, Error)> = None;

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, spec, Ok(connection))) => {
                tracing::info!(
                    key = %spec.key,
                    host = %spec.host(),
                    database = connection.database(),
                    "connection established"
                );
                handles[index] = Some(ConnectionHandle::new(connection));
            }
            Ok((index, _spec, Err(error))) => {
                if first_failure.as_ref().map_or(true, |(i, _)| index < *i) {
                    first_failure = Some((index, error));
                }
            }
            Err(join_error) => {
                if first_failure.is_none() {
                    first_failure = Some((usize::MAX, err!("connection task failed: {join_error}")));
                }
            }
        }
    }

    let opened: Vec<ConnectionHandle> = handles.into_iter().flatten().collect();

    match first_failure {
        None => Ok(opened),
        Some((_, error)) => Err((opened, error)),
    }
}

async fn resolve_one(root: &Path, spec: &ConnectionSpec) -> Result<Vec<SchemaDefinition>> {
    let files = resolver::resolve_patterns(root, &spec.schema_patterns)?;
    tracing::debug!(key = %spec.key, files = files.len(), "resolved schema patterns");
    resolver::load_definitions(&files).await
}
