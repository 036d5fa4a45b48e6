use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::{debug, info};

use super::MongoConfig;
use super::health::ping;
use crate::common::DatabaseResult;

/// Client and database handles produced by a bootstrap
///
/// Both are cheap to clone and share across tasks.
#[derive(Clone, Debug)]
pub struct MongoHandles {
    pub client: Client,
    pub database: Database,
}

/// Build a client from a resolved config and bind the configured database
///
/// The driver decides whether servers are contacted now or on first use.
/// For `mongodb+srv://` URIs, parsing resolves the SRV record, so DNS failures
/// surface here as [`DatabaseError::Mongo`](crate::DatabaseError::Mongo). Nothing is retried.
///
/// # Example
/// ```ignore
/// use database::mongodb::{connect, ConnectionUri, MongoConfig};
///
/// let config = MongoConfig::new(ConnectionUri::local("localhost:27017"), "mydb");
/// let handles = connect(&config).await?;
/// let items = handles.database.collection::<Document>("items");
/// ```
pub async fn connect(config: &MongoConfig) -> DatabaseResult<MongoHandles> {
    info!(uri = %config.uri, database = %config.database, "Creating MongoDB client");

    let mut options = ClientOptions::parse(config.uri.as_str()).await?;

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;
    let database = client.database(&config.database);

    debug!(database = %database.name(), "MongoDB client created");
    Ok(MongoHandles { client, database })
}

/// Like [`connect`], then issue a single `ping` to prove the server is reachable
///
/// A failed ping is returned as [`DatabaseError::Mongo`](crate::DatabaseError::Mongo)
/// with the driver error intact.
pub async fn connect_verified(config: &MongoConfig) -> DatabaseResult<MongoHandles> {
    let handles = connect(config).await?;
    ping(&handles.client).await?;

    info!("Successfully connected to MongoDB");
    Ok(handles)
}
