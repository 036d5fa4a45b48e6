//! MongoDB Bootstrap
//!
//! Command-line front end for `database::mongodb`. It owns all environment access:
//! it decides where credentials come from, whether a `.env` file is loaded and
//! whether a local `mongod` is started, then hands off to the bootstrapper.
//!
//! ```text
//! .env (optional) ─┐
//! MONGO_* vars ────┼─> MongoBootstrap::resolve ─> connect ─> Client + Database
//! --user/... flags ┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use core_config::tracing::init_tracing;
use core_config::{DotenvLoader, EnvFileLoader, Environment, FromEnv};
use database::mongodb::{
    ConnectionMode, CredentialSource, LocalMongod, MONGO_DBPATH, MongoBootstrap, MongoCredentials,
    check_health_detailed, connect,
};
use eyre::{Result, WrapErr, bail};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mongo-bootstrap")]
#[command(about = "Resolve MongoDB credentials and open a client for the configured database")]
pub struct Cli {
    /// Env file to preload. Defaults to the nearest `.env`
    #[arg(long, conflicts_with = "no_env_file")]
    pub env_file: Option<PathBuf>,

    /// Do not load any env file
    #[arg(long)]
    pub no_env_file: bool,

    /// Do not read credentials from MONGO_* variables
    ///
    /// Pass --user, --password, --host and --db-name instead.
    #[arg(long)]
    pub no_env: bool,

    #[arg(long, requires_all = ["no_env", "password", "host", "db_name"])]
    pub user: Option<String>,

    #[arg(long, requires_all = ["no_env", "user", "host", "db_name"])]
    pub password: Option<String>,

    #[arg(long, requires_all = ["no_env", "user", "password", "db_name"])]
    pub host: Option<String>,

    #[arg(long, requires_all = ["no_env", "user", "password", "host"])]
    pub db_name: Option<String>,

    /// Connect to a plain mongodb:// server (implied by APP_ENV=local)
    #[arg(long)]
    pub local: bool,

    /// Start a local mongod from MONGO_BIN / MONGO_DBPATH before connecting
    ///
    /// Implied in local mode whenever MONGO_DBPATH is set.
    #[arg(long)]
    pub spawn_mongod: bool,

    /// Never start a local mongod, even when MONGO_DBPATH is set
    #[arg(long, conflicts_with = "spawn_mongod")]
    pub no_spawn_mongod: bool,

    /// Application name reported to the server
    #[arg(long)]
    pub app_name: Option<String>,

    /// Resolve settings and print the redacted URI without connecting
    #[arg(long)]
    pub dry_run: bool,

    /// Ping the server after connecting and print the health status as JSON
    #[arg(long)]
    pub ping: bool,
}

impl Cli {
    /// Credentials given on the command line, only when all four are present
    pub fn explicit_credentials(&self) -> Option<MongoCredentials> {
        match (&self.user, &self.password, &self.host, &self.db_name) {
            (Some(user), Some(password), Some(host), Some(db_name)) => {
                Some(MongoCredentials::new(user, password, host, db_name))
            }
            _ => None,
        }
    }

    pub fn credential_source(&self) -> CredentialSource {
        CredentialSource::from_flag(!self.no_env, self.explicit_credentials())
    }

    pub fn connection_mode(&self, environment: &Environment) -> ConnectionMode {
        if self.local {
            ConnectionMode::Local
        } else {
            ConnectionMode::from(environment)
        }
    }

    pub fn env_file_loader(&self) -> Option<DotenvLoader> {
        if self.no_env_file {
            return None;
        }
        Some(match &self.env_file {
            Some(path) => DotenvLoader::from_path(path),
            None => DotenvLoader::new(),
        })
    }

    /// Whether to start a local `mongod` before connecting
    ///
    /// Only in local mode: either requested with `--spawn-mongod`, or implied
    /// by a configured `MONGO_DBPATH` unless `--no-spawn-mongod` is given.
    pub fn should_spawn_mongod(&self, mode: ConnectionMode) -> bool {
        if mode != ConnectionMode::Local || self.no_spawn_mongod {
            return false;
        }
        self.spawn_mongod || std::env::var_os(MONGO_DBPATH).is_some()
    }

    /// Load the env file, if any, then read `APP_ENV`
    ///
    /// Runs before tracing is set up so that `APP_ENV` and `RUST_LOG` may come
    /// from the file.
    pub fn load_environment(&self) -> Result<Environment> {
        if let Some(loader) = self.env_file_loader() {
            loader.load().wrap_err("Failed to load env file")?;
        }
        Ok(Environment::from_env())
    }

    /// Bootstrapper for the resolved environment
    ///
    /// The env file is expected to be loaded already by [`Cli::load_environment`].
    pub fn bootstrapper(&self, environment: &Environment) -> MongoBootstrap {
        let mut bootstrap = MongoBootstrap::new(self.credential_source())
            .with_mode(self.connection_mode(environment));

        if let Some(ref app_name) = self.app_name {
            bootstrap = bootstrap.with_app_name(app_name.clone());
        }
        bootstrap
    }
}

/// Run the bootstrapper
///
/// # Errors
///
/// Returns an error if:
/// - the env file is malformed
/// - no credential source is available (`--no-env` without explicit flags)
/// - a required MONGO_* variable is missing
/// - `--spawn-mongod` is given outside local mode, or the local mongod cannot be started
/// - the driver rejects the URI or, with `--ping`, the server is unreachable
pub async fn run(cli: Cli) -> Result<()> {
    let environment = cli.load_environment()?;
    init_tracing(&environment);

    let bootstrap = cli.bootstrapper(&environment);
    info!(mode = ?bootstrap.mode(), "Starting MongoDB bootstrap");

    if cli.spawn_mongod && bootstrap.mode() != ConnectionMode::Local {
        bail!("--spawn-mongod needs local mode (--local or APP_ENV=local)");
    }

    let config = bootstrap
        .resolve()
        .wrap_err("Failed to resolve MongoDB settings")?;

    if cli.dry_run {
        println!("{}", config.uri.redacted());
        return Ok(());
    }

    let _mongod = if cli.should_spawn_mongod(bootstrap.mode()) {
        let mongod = LocalMongod::from_env().wrap_err("Failed to load local mongod settings")?;
        let process = mongod.spawn().wrap_err("Failed to start local mongod")?;
        info!(pid = ?process.pid(), "Local mongod started");
        Some(process)
    } else {
        None
    };

    let handles = connect(&config)
        .await
        .wrap_err("Failed to create MongoDB client")?;
    info!(database = %handles.database.name(), "MongoDB handles ready");

    if cli.ping {
        let status = check_health_detailed(&handles.client).await;
        println!("{}", serde_json::to_string_pretty(&status)?);
        if !status.healthy {
            bail!("MongoDB health check failed");
        }
    }

    Ok(())
}
