use core_config::{DotenvLoader, EnvFileLoader, FromEnv};
use tracing::{debug, instrument};

use super::{
    ConnectionMode, MongoConfig, MongoCredentials, MongoHandles, connect, connect_verified,
};
use crate::common::{DatabaseError, DatabaseResult};

/// Where credentials come from
#[derive(Clone, Debug)]
pub enum CredentialSource {
    /// Read `MONGO_*` variables from the process environment
    Environment,
    /// Already resolved by the caller
    Explicit(MongoCredentials),
    /// Nothing supplied; resolving fails with [`DatabaseError::UninitializedCredentials`]
    Unset,
}

impl CredentialSource {
    /// Map the "load from environment" flag to a source
    ///
    /// With the flag off, `fallback` is the only way to supply credentials.
    pub fn from_flag(load_from_environment: bool, fallback: Option<MongoCredentials>) -> Self {
        if load_from_environment {
            CredentialSource::Environment
        } else {
            fallback.map_or(CredentialSource::Unset, CredentialSource::Explicit)
        }
    }
}

/// Single-shot construction of MongoDB client and database handles
///
/// Steps, in order:
/// 1. fail fast when no credential source is available
/// 2. run the env-file loader, if one was supplied
/// 3. resolve credentials and build the URI
/// 4. hand the URI to the driver and bind the database
///
/// Steps 1–3 never touch the network.
///
/// # Example
///
/// ```ignore
/// use core_config::DotenvLoader;
/// use database::mongodb::{CredentialSource, MongoBootstrap};
///
/// let handles = MongoBootstrap::new(CredentialSource::Environment)
///     .with_env_file_loader(DotenvLoader::new())
///     .construct()
///     .await?;
/// let users = handles.database.collection::<Document>("users");
/// ```
pub struct MongoBootstrap {
    source: CredentialSource,
    mode: ConnectionMode,
    env_file: Option<Box<dyn EnvFileLoader>>,
    app_name: Option<String>,
}

impl MongoBootstrap {
    pub fn new(source: CredentialSource) -> Self {
        Self {
            source,
            mode: ConnectionMode::default(),
            env_file: None,
            app_name: None,
        }
    }

    pub fn with_env_file_loader(mut self, loader: impl EnvFileLoader + 'static) -> Self {
        self.env_file = Some(Box::new(loader));
        self
    }

    pub fn with_mode(mut self, mode: ConnectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    /// Resolve credentials into a ready-to-use config without connecting
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub fn resolve(&self) -> DatabaseResult<MongoConfig> {
        if matches!(self.source, CredentialSource::Unset) {
            return Err(DatabaseError::UninitializedCredentials);
        }

        if let Some(loader) = &self.env_file {
            loader.load()?;
        }

        let credentials = match &self.source {
            CredentialSource::Environment => match self.mode {
                ConnectionMode::Atlas => MongoCredentials::from_env()?,
                ConnectionMode::Local => MongoCredentials::local_from_env()?,
            },
            CredentialSource::Explicit(credentials) => credentials.clone(),
            CredentialSource::Unset => return Err(DatabaseError::UninitializedCredentials),
        };

        let mut config = MongoConfig::from_credentials(&credentials, self.mode);
        if let Some(ref app_name) = self.app_name {
            config = config.with_app_name(app_name.clone());
        }

        debug!(uri = %config.uri, database = %config.database, "Resolved MongoDB settings");
        Ok(config)
    }

    /// Resolve, then build the client and database handles
    pub async fn construct(&self) -> DatabaseResult<MongoHandles> {
        let config = self.resolve()?;
        connect(&config).await
    }

    /// Resolve, build the handles, then ping the server once
    pub async fn construct_verified(&self) -> DatabaseResult<MongoHandles> {
        let config = self.resolve()?;
        connect_verified(&config).await
    }
}

/// Build handles the default way: optional `.env` file, then `MONGO_*` variables
///
/// With `load_from_environment == false` there is no other credential source,
/// so this fails with [`DatabaseError::UninitializedCredentials`]. Use
/// [`MongoBootstrap`] with [`CredentialSource::Explicit`] instead.
pub async fn bootstrap(load_from_environment: bool) -> DatabaseResult<MongoHandles> {
    MongoBootstrap::new(CredentialSource::from_flag(load_from_environment, None))
        .with_env_file_loader(DotenvLoader::new())
        .construct()
        .await
}
