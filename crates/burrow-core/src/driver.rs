pub mod operation;
pub use operation::Operation;

mod ready_state;
pub use ready_state::ReadyState;

mod response;
pub use response::{Response, Rows};

use crate::async_trait;

use std::fmt::Debug;
use url::Url;

/// Driver options passed to [`Driver::connect`], after the registry has
/// merged its mandatory defaults underneath the caller-supplied values.
pub type ConnectOptions = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Establishes a connection to the target described by `url`.
    ///
    /// Completes when the driver reports the connection live or a terminal
    /// network/auth failure. Drivers do not retry at this layer.
    async fn connect(&self, url: &Url, options: &ConnectOptions)
        -> crate::Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + Sync + 'static {
    /// Host this connection targets.
    fn host(&self) -> &str;

    /// Port this connection targets, when the URL named one.
    fn port(&self) -> Option<u16>;

    /// Name of the database this connection is bound to.
    fn database(&self) -> &str;

    /// Current readiness of the connection.
    fn ready_state(&self) -> ReadyState;

    /// Execute a document operation against the connection.
    async fn exec(&self, op: Operation) -> crate::Result<Response>;

    /// Closes the connection. Subsequent `exec` calls fail.
    async fn close(&self) -> crate::Result<()>;
}
