use std::fmt;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_required};

/// Environment variable holding the database user
pub const MONGO_USER: &str = "MONGO_USER";
/// Environment variable holding the database password
pub const MONGO_PASS: &str = "MONGO_PASS";
/// Environment variable holding the cluster host (`cluster0.example.net`, or `host:port` locally)
pub const MONGO_URL: &str = "MONGO_URL";
/// Environment variable holding the database name
pub const MONGO_DB_NAME: &str = "MONGO_DB_NAME";

/// Credentials needed to build a connection URI
///
/// Values are taken as-is: no validation and no escaping. The password is
/// never printed by `Debug`.
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoCredentials;
///
/// let creds = MongoCredentials::new("u", "p", "cluster0.example.net", "mydb");
///
/// // From MONGO_USER, MONGO_PASS, MONGO_URL and MONGO_DB_NAME (requires `config` feature)
/// let creds = MongoCredentials::from_env()?;
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MongoCredentials {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,
}

impl MongoCredentials {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            host: host.into(),
            database: database.into(),
        }
    }

    /// Credentials for an unauthenticated local server
    pub fn local(host: impl Into<String>, database: impl Into<String>) -> Self {
        Self::new(String::new(), String::new(), host, database)
    }

    /// Load host and database name only (local mode)
    ///
    /// `MONGO_USER` and `MONGO_PASS` are not consulted.
    #[cfg(feature = "config")]
    pub fn local_from_env() -> Result<Self, ConfigError> {
        let host = env_required(MONGO_URL)?;
        let database = env_required(MONGO_DB_NAME)?;
        Ok(Self::local(host, database))
    }
}

impl fmt::Debug for MongoCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoCredentials")
            .field("user", &self.user)
            .field("password", &"****")
            .field("host", &self.host)
            .field("database", &self.database)
            .finish()
    }
}

/// Load credentials from the environment
///
/// Environment variables (all required):
/// - `MONGO_USER`
/// - `MONGO_PASS`
/// - `MONGO_URL`
/// - `MONGO_DB_NAME`
///
/// The first absent variable is reported.
#[cfg(feature = "config")]
impl FromEnv for MongoCredentials {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            user: env_required(MONGO_USER)?,
            password: env_required(MONGO_PASS)?,
            host: env_required(MONGO_URL)?,
            database: env_required(MONGO_DB_NAME)?,
        })
    }
}
