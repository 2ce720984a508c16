use super::Error;

/// Error when a file matched by a schema pattern cannot be used as a schema
/// definition.
///
/// This occurs when a matched file cannot be read, does not parse as a
/// definition document, or declares no model name. The underlying cause is
/// chained via [`Error::context`].
#[derive(Debug)]
pub(super) struct SchemaResolutionError {
    path: Box<str>,
}

impl std::error::Error for SchemaResolutionError {}

impl core::fmt::Display for SchemaResolutionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "failed to load schema definition `{}`", self.path)
    }
}

impl Error {
    /// Creates a schema resolution error for the given file.
    pub fn schema_resolution(path: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::SchemaResolution(SchemaResolutionError {
            path: path.into().into(),
        }))
    }

    /// Returns `true` if this error is a schema resolution error.
    pub fn is_schema_resolution(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::SchemaResolution(_))
    }
}
