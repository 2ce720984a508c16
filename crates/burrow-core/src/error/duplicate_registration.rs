use super::Error;

/// Error when the host application already has an active registration under
/// the same identity.
///
/// Rejected before any connection work begins, so a racing registration
/// never leaks connections.
#[derive(Debug)]
pub(super) struct DuplicateRegistrationError {
    identity: Box<str>,
}

impl std::error::Error for DuplicateRegistrationError {}

impl core::fmt::Display for DuplicateRegistrationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "registry already registered under `{}`", self.identity)
    }
}

impl Error {
    /// Creates a duplicate registration error naming the identity.
    pub fn duplicate_registration(identity: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateRegistration(
            DuplicateRegistrationError {
                identity: identity.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a duplicate registration error.
    pub fn is_duplicate_registration(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateRegistration(_))
    }
}
