//! Optional `.env` file loading
//!
//! Loading an env file is a capability the caller may hand to a consumer or leave out.
//! Values already present in the process environment always win over the file.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ConfigError;

/// Something that can populate the process environment from a local file.
///
/// Returns the path that was loaded, or `None` when there was nothing to load.
pub trait EnvFileLoader: Send + Sync {
    fn load(&self) -> Result<Option<PathBuf>, ConfigError>;
}

/// [`EnvFileLoader`] backed by `dotenvy`
///
/// # Example
///
/// ```ignore
/// use core_config::{DotenvLoader, EnvFileLoader};
///
/// // Search for `.env` in the current directory and its parents
/// DotenvLoader::new().load()?;
///
/// // Load a specific file
/// DotenvLoader::from_path("config/.env").load()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct DotenvLoader {
    path: Option<PathBuf>,
}

impl DotenvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl EnvFileLoader for DotenvLoader {
    fn load(&self) -> Result<Option<PathBuf>, ConfigError> {
        let result = match &self.path {
            Some(path) => dotenvy::from_path(path).map(|_| path.clone()),
            None => dotenvy::dotenv(),
        };

        match result {
            Ok(path) => {
                debug!(path = %path.display(), "Loaded env file");
                Ok(Some(path))
            }
            Err(e) if e.not_found() => {
                debug!("No env file found, skipping");
                Ok(None)
            }
            Err(e) => Err(ConfigError::EnvFile {
                path: self
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| ".env".to_string()),
                details: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_env_file(name: &str, contents: &str) -> PathBuf {
        let file_name = format!("core_config_{}_{}.env", name, std::process::id());
        let path = std::env::temp_dir().join(file_name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_sets_missing_vars() {
        let path = write_env_file("sets", "CORE_CONFIG_ENV_FILE_A=from_file\n");

        temp_env::with_var_unset("CORE_CONFIG_ENV_FILE_A", || {
            let loaded = DotenvLoader::from_path(&path).load().unwrap();
            assert_eq!(loaded.as_deref(), Some(path.as_path()));
            assert_eq!(std::env::var("CORE_CONFIG_ENV_FILE_A").unwrap(), "from_file");
        });

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_does_not_override_existing() {
        let path = write_env_file("keeps", "CORE_CONFIG_ENV_FILE_B=from_file\n");

        temp_env::with_var("CORE_CONFIG_ENV_FILE_B", Some("from_process"), || {
            DotenvLoader::from_path(&path).load().unwrap();
            assert_eq!(
                std::env::var("CORE_CONFIG_ENV_FILE_B").unwrap(),
                "from_process"
            );
        });

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let loader = DotenvLoader::from_path("/definitely/not/here/.env");
        let loaded = loader.load().unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = write_env_file("broken", "NOT VALID LINE 'unterminated\n");

        let err = DotenvLoader::from_path(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
        assert!(err.to_string().contains("env file"));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_loader_path_accessor() {
        assert!(DotenvLoader::new().path().is_none());
        assert_eq!(
            DotenvLoader::from_path("a/.env").path(),
            Some(Path::new("a/.env"))
        );
    }
}
