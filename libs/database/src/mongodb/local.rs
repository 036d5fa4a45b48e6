//! Local `mongod` launcher for development
//!
//! Spawns a `mongod` next to the application and forwards its output into tracing.
//! The server lives as long as the returned [`MongodProcess`] (or until it exits on its own).

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_required};

use crate::common::{DatabaseError, DatabaseResult};

/// Environment variable naming the `mongod` executable
pub const MONGO_BIN: &str = "MONGO_BIN";
/// Environment variable naming the data directory
pub const MONGO_DBPATH: &str = "MONGO_DBPATH";

/// `mongod` exit status when another instance already holds the data directory
pub const ALREADY_RUNNING_EXIT_CODE: i32 = 100;

/// Resolve a data directory; paths starting with `.` are taken relative to `base`
pub fn resolve_db_path(raw: &str, base: &Path) -> PathBuf {
    if raw.starts_with('.') {
        base.join(raw)
    } else {
        PathBuf::from(raw)
    }
}

/// How to launch a local `mongod`
///
/// # Example
///
/// ```ignore
/// use database::mongodb::LocalMongod;
///
/// let mongod = LocalMongod::new("mongod", "/var/lib/mongo-dev");
/// let process = mongod.spawn()?;
/// // ... connect with ConnectionMode::Local ...
/// process.stop().await;
/// ```
#[derive(Clone, Debug)]
pub struct LocalMongod {
    pub binary: PathBuf,
    pub db_path: PathBuf,
    /// Passed ahead of `--dbpath`, e.g. `--port 27018`
    pub extra_args: Vec<String>,
}

impl LocalMongod {
    pub fn new(binary: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            db_path: db_path.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Read `MONGO_BIN` (default `mongod`) and `MONGO_DBPATH`
    ///
    /// Relative data directories are resolved against `base`.
    #[cfg(feature = "config")]
    pub fn from_env_with_base(base: &Path) -> Result<Self, ConfigError> {
        let binary = env_or_default(MONGO_BIN, "mongod");
        let db_path = env_required(MONGO_DBPATH)?;
        Ok(Self::new(binary, resolve_db_path(&db_path, base)))
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.push(format!("--dbpath={}", self.db_path.display()));
        args
    }

    /// Start the process; output is forwarded to tracing in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self) -> DatabaseResult<MongodProcess> {
        debug!(
            binary = %self.binary.display(),
            db_path = %self.db_path.display(),
            "Spawning mongod"
        );

        let mut child = Command::new(&self.binary)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DatabaseError::LocalServer(format!(
                    "failed to spawn '{}': {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, Output::Stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, Output::Stderr));
        }

        let pid = child.id();
        let (stop_tx, stop_rx) = oneshot::channel();

        let exit = tokio::spawn(async move {
            let status = tokio::select! {
                status = child.wait() => status,
                _ = stop_rx => {
                    let _ = child.start_kill();
                    child.wait().await
                }
            };

            match status {
                Ok(status) => {
                    let code = status.code();
                    warn!(code = ?code, "mongod exited");
                    if code == Some(ALREADY_RUNNING_EXIT_CODE) {
                        warn!("mongod instance already running, its output is unavailable");
                    }
                    code
                }
                Err(e) => {
                    error!(error = %e, "Failed to wait for mongod");
                    None
                }
            }
        });

        debug!(pid = ?pid, "Created mongod process");
        Ok(MongodProcess {
            pid,
            stop: Some(stop_tx),
            exit,
        })
    }
}

#[cfg(feature = "config")]
impl FromEnv for LocalMongod {
    fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_env_with_base(&base)
    }
}

/// A running `mongod`; dropping it stops the server
#[derive(Debug)]
pub struct MongodProcess {
    pid: Option<u32>,
    stop: Option<oneshot::Sender<()>>,
    exit: JoinHandle<Option<i32>>,
}

impl MongodProcess {
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Wait for the process to exit on its own and return its exit code
    pub async fn wait(mut self) -> Option<i32> {
        (&mut self.exit).await.ok().flatten()
    }

    /// Kill the process and return its exit code (`None` when killed by a signal)
    pub async fn stop(mut self) -> Option<i32> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        (&mut self.exit).await.ok().flatten()
    }
}

#[derive(Clone, Copy)]
enum Output {
    Stdout,
    Stderr,
}

async fn forward_lines<R>(reader: R, output: Output)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match output {
                Output::Stdout => debug!("[mongod/stdout] {}", line),
                Output::Stderr => error!("[mongod/stderr] {}", line),
            },
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Stopped reading mongod output");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_db_path() {
        let base = Path::new("/srv/app");
        assert_eq!(resolve_db_path("./data", base), PathBuf::from("/srv/app/data"));
        assert_eq!(resolve_db_path("../data", base), PathBuf::from("/srv/app/../data"));
    }

    #[test]
    fn test_resolve_absolute_db_path() {
        let base = Path::new("/srv/app");
        assert_eq!(
            resolve_db_path("/var/lib/mongo", base),
            PathBuf::from("/var/lib/mongo")
        );
        assert_eq!(resolve_db_path("data", base), PathBuf::from("data"));
    }

    #[test]
    fn test_args() {
        let mongod = LocalMongod::new("mongod", "/tmp/db");
        assert_eq!(mongod.args(), vec!["--dbpath=/tmp/db".to_string()]);

        let mongod = mongod.with_args(["--port", "27018"]);
        assert_eq!(mongod.args(), vec!["--port", "27018", "--dbpath=/tmp/db"]);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_with_base() {
        temp_env::with_vars(
            [(MONGO_BIN, None::<&str>), (MONGO_DBPATH, Some("./mongo-data"))],
            || {
                let mongod = LocalMongod::from_env_with_base(Path::new("/srv/app")).unwrap();
                assert_eq!(mongod.binary, PathBuf::from("mongod"));
                assert_eq!(mongod.db_path, PathBuf::from("/srv/app/mongo-data"));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_requires_db_path() {
        temp_env::with_var_unset(MONGO_DBPATH, || {
            let err = LocalMongod::from_env_with_base(Path::new("/")).unwrap_err();
            assert!(err.to_string().contains(MONGO_DBPATH));
        });
    }

    #[tokio::test]
    async fn test_spawn_missing_binary() {
        let mongod = LocalMongod::new("/nonexistent/bin/mongod", "/tmp/db");
        let err = mongod.spawn().unwrap_err();
        assert!(matches!(err, DatabaseError::LocalServer(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_reports_exit_code() {
        // `sh` rejects the unknown --dbpath option and exits non-zero
        let mongod = LocalMongod::new("sh", "/tmp/db");
        let process = mongod.spawn().unwrap();
        assert!(process.pid().is_some());

        let code = process.wait().await;
        assert!(code.is_some());
        assert_ne!(code, Some(0));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_kills_process() {
        // Run through `sh` so the freshly written file is never exec'd directly (ETXTBSY)
        let script = std::env::temp_dir().join(format!("fake_mongod_{}.sh", std::process::id()));
        std::fs::write(&script, "sleep 30\n").unwrap();

        let process = LocalMongod::new("sh", "/tmp/db")
            .with_args([script.display().to_string()])
            .spawn()
            .unwrap();
        assert!(process.pid().is_some());
        let code = process.stop().await;
        // Killed by a signal, so no exit code
        assert_eq!(code, None);

        std::fs::remove_file(script).ok();
    }
}
