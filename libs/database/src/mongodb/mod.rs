//! MongoDB connection bootstrap
//!
//! Credentials → connection URI → driver client → database handle.
//! Also hosts a health check and a launcher for a local `mongod`.

#[cfg(feature = "config")]
mod bootstrap;
mod config;
mod connector;
mod credentials;
mod health;
mod local;
mod uri;

#[cfg(feature = "config")]
pub use bootstrap::{CredentialSource, MongoBootstrap, bootstrap};
pub use config::MongoConfig;
pub use connector::{MongoHandles, connect, connect_verified};
pub use credentials::{MONGO_DB_NAME, MONGO_PASS, MONGO_URL, MONGO_USER, MongoCredentials};
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use local::{
    ALREADY_RUNNING_EXIT_CODE, LocalMongod, MONGO_BIN, MONGO_DBPATH, MongodProcess,
    resolve_db_path,
};
pub use uri::{CLUSTER_QUERY, ConnectionMode, ConnectionUri};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
