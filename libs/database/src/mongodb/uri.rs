use std::fmt;

use super::MongoCredentials;

/// Fixed query options appended to every cluster URI
pub const CLUSTER_QUERY: &str = "retryWrites=true&w=majority";

/// Which kind of server the URI points at
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Managed cluster reached through `mongodb+srv://` with credentials
    #[default]
    Atlas,
    /// Plain `mongodb://host` server without authentication
    Local,
}

#[cfg(feature = "config")]
impl From<&core_config::Environment> for ConnectionMode {
    fn from(environment: &core_config::Environment) -> Self {
        if environment.is_local() {
            ConnectionMode::Local
        } else {
            ConnectionMode::Atlas
        }
    }
}

/// A fully formed connection string
///
/// Built once from [`MongoCredentials`]; values are substituted verbatim.
/// `Display` and `Debug` print the redacted form, use [`ConnectionUri::as_str`]
/// for the real string.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionUri {
    uri: String,
    redacted: String,
}

impl ConnectionUri {
    /// `mongodb+srv://{user}:{pass}@{host}/{db}?retryWrites=true&w=majority`
    pub fn cluster(credentials: &MongoCredentials) -> Self {
        let MongoCredentials {
            user,
            password,
            host,
            database,
        } = credentials;

        Self {
            uri: format!("mongodb+srv://{user}:{password}@{host}/{database}?{CLUSTER_QUERY}"),
            redacted: format!("mongodb+srv://{user}:****@{host}/{database}?{CLUSTER_QUERY}"),
        }
    }

    /// `mongodb://{host}`
    pub fn local(host: &str) -> Self {
        let uri = format!("mongodb://{host}");
        Self {
            redacted: uri.clone(),
            uri,
        }
    }

    pub fn for_mode(mode: ConnectionMode, credentials: &MongoCredentials) -> Self {
        match mode {
            ConnectionMode::Atlas => Self::cluster(credentials),
            ConnectionMode::Local => Self::local(&credentials.host),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// The URI with the password masked, safe for logs
    pub fn redacted(&self) -> &str {
        &self.redacted
    }
}

impl fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionUri").field(&self.redacted).finish()
    }
}
