use super::Error;

/// Error when establishing a connection to a database target fails.
///
/// Carries the target host and port. The driver-level cause (DNS failure,
/// refused connection, authentication rejection) is chained onto the error
/// via [`Error::context`].
#[derive(Debug)]
pub(super) struct ConnectionFailedError {
    host: Box<str>,
    port: Option<u16>,
}

impl std::error::Error for ConnectionFailedError {}

impl core::fmt::Display for ConnectionFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "failed to connect to {}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a connection failure error for the given target.
    pub fn connection_failed(host: impl Into<String>, port: Option<u16>) -> Error {
        Error::from(super::ErrorKind::ConnectionFailed(ConnectionFailedError {
            host: host.into().into(),
            port,
        }))
    }

    /// Returns `true` if this error is a connection failure.
    pub fn is_connection_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ConnectionFailed(_))
    }
}
