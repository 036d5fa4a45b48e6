/// Unified error type for connection bootstrap
///
/// Nothing here is recovered locally: every variant surfaces to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A required credential variable was absent when reading the environment
    #[error("Missing credential: environment variable '{0}' is not set")]
    MissingCredential(String),

    /// Environment loading was disabled and no other credential source was given
    #[error("Credentials not initialized: environment loading is disabled and none were supplied")]
    UninitializedCredentials,

    /// Driver errors, passed through unchanged
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Configuration error (env file, malformed values)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Local mongod process could not be managed
    #[error("Local server error: {0}")]
    LocalServer(String),
}

#[cfg(feature = "config")]
impl From<core_config::ConfigError> for DatabaseError {
    fn from(err: core_config::ConfigError) -> Self {
        match err {
            core_config::ConfigError::MissingEnvVar(key) => DatabaseError::MissingCredential(key),
            other => DatabaseError::ConfigError(other.to_string()),
        }
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
