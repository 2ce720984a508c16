use burrow_core::{driver::ConnectOptions, Error, Result};

use indexmap::IndexSet;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Registration configuration accepted by [`crate::App::register`].
///
/// Exactly one of `connection` / `connections` must be present. The single
/// form publishes the flattened registry shape; the list form publishes the
/// keyed map.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub connection: Option<ConnectionConfig>,

    #[serde(default)]
    pub connections: Option<Vec<ConnectionConfig>>,
}

/// One connection target descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Explicit registry key. Wins over the database name from the URI.
    #[serde(default)]
    pub alias: Option<String>,

    /// Connection URI, e.g. `mongodb://localhost:27017/test`.
    pub uri: String,

    /// Driver options. Overlaid on the registry defaults; caller values win.
    #[serde(default)]
    pub options: ConnectOptions,

    /// Glob patterns selecting schema definition files, in order. A `!`
    /// prefix excludes previously matched files.
    #[serde(default)]
    pub schema_patterns: Vec<String>,
}

impl Config {
    /// Single-connection configuration.
    pub fn single(connection: ConnectionConfig) -> Self {
        Self {
            connection: Some(connection),
            connections: None,
        }
    }

    /// Multi-connection configuration.
    pub fn list(connections: Vec<ConnectionConfig>) -> Self {
        Self {
            connection: None,
            connections: Some(connections),
        }
    }

    /// Whether this configuration uses the flattened single-connection form.
    pub(crate) fn is_single(&self) -> bool {
        self.connection.is_some()
    }

    /// Normalizes the configuration into an ordered list of connection specs
    /// with unique, non-empty keys.
    ///
    /// Pure transformation; performs no I/O. Every failure here is a
    /// configuration error and no connection attempt has been made.
    pub(crate) fn normalize(&self) -> Result<Vec<ConnectionSpec>> {
        let raw: Vec<&ConnectionConfig> = match (&self.connection, &self.connections) {
            (Some(_), Some(_)) => {
                return Err(Error::configuration(
                    "supply either `connection` or `connections`, not both",
                ))
            }
            (None, None) => {
                return Err(Error::configuration(
                    "one of `connection` or `connections` is required",
                ))
            }
            (Some(connection), None) => vec![connection],
            (None, Some(connections)) if connections.is_empty() => {
                return Err(Error::configuration("`connections` must not be empty"))
            }
            (None, Some(connections)) => connections.iter().collect(),
        };

        let mut specs = Vec::with_capacity(raw.len());
        let mut keys = IndexSet::new();

        for (index, config) in raw.into_iter().enumerate() {
            let spec = ConnectionSpec::from_config(config, index)?;
            if !keys.insert(spec.key.clone()) {
                return Err(Error::configuration(format!(
                    "duplicate connection key `{}`",
                    spec.key
                )));
            }
            specs.push(spec);
        }

        Ok(specs)
    }
}

impl ConnectionConfig {
    /// Descriptor for the given URI, with no alias, options, or patterns.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            alias: None,
            uri: uri.into(),
            options: ConnectOptions::new(),
            schema_patterns: vec![],
        }
    }

    /// Sets the explicit registry key for this target.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Adds one driver option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Appends one schema file pattern.
    pub fn schema_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.schema_patterns.push(pattern.into());
        self
    }
}

/// A normalized connection target carrying its derived registry key.
#[derive(Debug, Clone)]
pub struct ConnectionSpec {
    /// Unique key this target publishes under.
    pub key: String,

    /// Parsed connection URI.
    pub uri: Url,

    /// Caller-supplied driver options.
    pub options: ConnectOptions,

    /// Schema file patterns, in configuration order.
    pub schema_patterns: Vec<String>,
}

impl ConnectionSpec {
    fn from_config(config: &ConnectionConfig, index: usize) -> Result<Self> {
        if config.uri.trim().is_empty() {
            return Err(Error::configuration(format!(
                "connection {index} has an empty URI"
            )));
        }

        let uri = Url::parse(&config.uri).map_err(|err| {
            Error::configuration(format!(
                "malformed connection URI `{}`: {err}",
                config.uri
            ))
        })?;

        // Key derivation: explicit alias verbatim, else the database name
        // embedded in the URI, else the position in the normalized list.
        let key = match &config.alias {
            Some(alias) if alias.trim().is_empty() => {
                return Err(Error::configuration(format!(
                    "connection {index} has an empty alias"
                )))
            }
            Some(alias) => alias.clone(),
            None => match database_name(&uri) {
                Some(name) => name.to_string(),
                None => index.to_string(),
            },
        };

        Ok(Self {
            key,
            uri,
            options: config.options.clone(),
            schema_patterns: config.schema_patterns.clone(),
        })
    }

    /// Host this spec targets, for error reporting.
    pub(crate) fn host(&self) -> &str {
        self.uri.host_str().unwrap_or("localhost")
    }

    /// Port this spec targets, when the URI named one.
    pub(crate) fn port(&self) -> Option<u16> {
        self.uri.port()
    }
}

/// Database name embedded in a connection URI, if any.
fn database_name(uri: &Url) -> Option<&str> {
    let path = uri.path().trim_start_matches('/');
    let name = path.split('?').next().unwrap_or(path);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
