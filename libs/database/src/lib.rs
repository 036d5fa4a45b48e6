//! Database library for bootstrapping MongoDB connections
//!
//! Turns credentials (usually `MONGO_*` environment variables, optionally preloaded
//! from a `.env` file) into a driver client and a handle to the configured database.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector, health check, local `mongod` launcher
//! - `config` (default) - `core_config::FromEnv` support and the
//!   [`mongodb::MongoBootstrap`] entry point
//! - `all` - All features
//!
//! # Examples
//!
//! ## From the environment
//!
//! ```ignore
//! use database::mongodb;
//!
//! // Loads `.env` if present, then reads MONGO_USER, MONGO_PASS, MONGO_URL, MONGO_DB_NAME
//! let handles = mongodb::bootstrap(true).await?;
//! let users = handles.database.collection::<Document>("users");
//! ```
//!
//! ## With explicit credentials
//!
//! ```ignore
//! use database::mongodb::{CredentialSource, MongoBootstrap, MongoCredentials};
//!
//! let creds = MongoCredentials::new("u", "p", "cluster0.example.net", "mydb");
//! let handles = MongoBootstrap::new(CredentialSource::Explicit(creds))
//!     .construct_verified()
//!     .await?;
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
