use super::{ConnectionMode, ConnectionUri, MongoCredentials};

/// Resolved MongoDB connection settings
///
/// Everything the connector needs, with no environment access left to do.
/// Pool sizes and timeouts are left to the driver defaults.
///
/// # Example
///
/// ```ignore
/// use database::mongodb::{ConnectionMode, MongoConfig, MongoCredentials};
///
/// let creds = MongoCredentials::new("u", "p", "cluster0.example.net", "mydb");
/// let config = MongoConfig::from_credentials(&creds, ConnectionMode::Atlas)
///     .with_app_name("reporting");
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string handed to the driver
    pub uri: ConnectionUri,

    /// Database the returned handle is bound to
    pub database: String,

    /// Optional application name for server logs
    pub app_name: Option<String>,
}

impl MongoConfig {
    pub fn new(uri: ConnectionUri, database: impl Into<String>) -> Self {
        Self {
            uri,
            database: database.into(),
            app_name: None,
        }
    }

    pub fn from_credentials(credentials: &MongoCredentials, mode: ConnectionMode) -> Self {
        Self::new(
            ConnectionUri::for_mode(mode, credentials),
            credentials.database.clone(),
        )
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn uri(&self) -> &ConnectionUri {
        &self.uri
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}
