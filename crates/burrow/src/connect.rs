use crate::config::ConnectionSpec;

use burrow_core::{
    async_trait,
    driver::{ConnectOptions, Connection, Driver},
    err, Error, Result,
};

use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Mandatory driver defaults injected into every connect.
///
/// Defaults are computed first and the caller's options are overlaid on top,
/// so an explicit caller value always wins and the defaults only fill gaps.
fn default_options() -> ConnectOptions {
    let mut options = ConnectOptions::new();
    options.insert("urlParser".to_string(), Value::String("strict".to_string()));
    options
}

pub(crate) fn merged_options(spec: &ConnectionSpec) -> ConnectOptions {
    let mut options = default_options();
    options.extend(spec.options.iter().map(|(key, value)| (key.clone(), value.clone())));
    options
}

/// Establishes the connection for one spec via the given driver.
///
/// No retry at this layer: a driver failure surfaces immediately, wrapped
/// with the target host/port. `timeout` bounds the attempt when supplied;
/// absent, a hung driver connect blocks registration indefinitely.
pub(crate) async fn establish(
    driver: &dyn Driver,
    spec: &ConnectionSpec,
    timeout: Option<Duration>,
) -> Result<Box<dyn Connection>> {
    let options = merged_options(spec);
    let attempt = driver.connect(&spec.uri, &options);

    let result = match timeout {
        Some(timeout) => match tokio::time::timeout(timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(err!("connect timed out after {}ms", timeout.as_millis())),
        },
        None => attempt.await,
    };

    result.map_err(|cause| cause.context(Error::connection_failed(spec.host(), spec.port())))
}

/// Dispatches a connection URL to the driver built in for its scheme.
///
/// Used when no driver is injected on the registry builder.
#[derive(Debug, Default)]
pub struct Connect;

impl Connect {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Driver for Connect {
    async fn connect(&self, url: &Url, options: &ConnectOptions) -> Result<Box<dyn Connection>> {
        match url.scheme() {
            "mongodb" => connect_mongodb(url, options).await,
            scheme => Err(err!("unsupported database; scheme={scheme}; url={url}")),
        }
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(url: &Url, options: &ConnectOptions) -> Result<Box<dyn Connection>> {
    burrow_driver_mongodb::MongoDb::new().connect(url, options).await
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_url: &Url, _options: &ConnectOptions) -> Result<Box<dyn Connection>> {
    Err(err!("`mongodb` feature not enabled"))
}
