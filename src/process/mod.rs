//! Invocations of the external catalog tool.
//!
//! [`ToolProcess`] owns a running child for its whole lifetime. Callers read its
//! stdout and then call [`ToolProcess::finish`] to check the exit status; if the
//! handle is dropped first (an error, or the pipeline shutting down) the child is
//! killed and reaped so no zombie or open pipe outlives the fetch. A
//! [`ProcessKiller`] lets another thread kill the child while it is being read.

use std::ffi::OsString;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::IndexerConfig;
use crate::error::{IndexError, Result};
use crate::models::Prefix;

const ROOT_PATH_FLAG: &str = "-rootpath";
const LIST_NAMES_FLAG: &str = "-ll";
const LIST_XML_FLAG: &str = "-lx";

/// The external tool and the data root it is pointed at
#[derive(Debug, Clone)]
pub struct CatalogTool {
    binary: PathBuf,
    root_path: PathBuf,
}

impl CatalogTool {
    pub fn new(binary: impl Into<PathBuf>, root_path: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into(), root_path: root_path.into() }
    }

    pub fn from_config(config: &IndexerConfig) -> Self {
        Self::new(&config.binary_path, &config.root_path)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// `binary -rootpath <root> -ll`: one header line, then `<name> <description>` lines
    pub fn list_names(&self) -> Result<ToolProcess> {
        self.spawn(vec![LIST_NAMES_FLAG.into()])
    }

    /// `binary -rootpath <root> -lx <pattern>`: XML for every machine matching the prefix
    pub fn list_xml(&self, prefix: &Prefix) -> Result<ToolProcess> {
        self.spawn(vec![LIST_XML_FLAG.into(), prefix.pattern().into()])
    }

    fn spawn(&self, extra: Vec<OsString>) -> Result<ToolProcess> {
        let mut args: Vec<OsString> = vec![ROOT_PATH_FLAG.into(), self.root_path.clone().into()];
        args.extend(extra);
        let printable =
            args.iter().map(|a| a.to_string_lossy().into_owned()).collect::<Vec<_>>().join(" ");

        log::debug!("Running {} {}", self.binary.display(), printable);
        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| IndexError::ProcessSpawn {
                binary: self.binary.clone(),
                args: printable.clone(),
                source,
            })?;

        let stdout = child.stdout.take().map(BufReader::new);
        Ok(ToolProcess {
            child: Arc::new(Mutex::new(child)),
            stdout,
            command: format!("{} {}", self.binary.display(), printable),
            reaped: false,
        })
    }
}

/// A running tool invocation
pub struct ToolProcess {
    child: Arc<Mutex<Child>>,
    stdout: Option<BufReader<ChildStdout>>,
    command: String,
    reaped: bool,
}

impl ToolProcess {
    /// Command line, for diagnostics
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Handle that kills this invocation from any thread
    pub fn killer(&self) -> ProcessKiller {
        ProcessKiller { child: Arc::clone(&self.child), command: self.command.clone() }
    }

    /// Take the buffered stdout. Can only be taken once.
    pub fn take_stdout(&mut self) -> Result<BufReader<ChildStdout>> {
        self.stdout.take().ok_or_else(|| IndexError::ProcessRead {
            command: self.command.clone(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout not available"),
        })
    }

    /// Wait for the tool to exit; a non-zero status is an error
    pub fn finish(mut self) -> Result<()> {
        drop(self.stdout.take());
        let status = lock_child(&self.child).wait().map_err(|source| IndexError::ProcessRead {
            command: self.command.clone(),
            source,
        })?;
        self.reaped = true;

        if !status.success() {
            return Err(IndexError::ProcessExit { command: self.command.clone(), status });
        }
        Ok(())
    }
}

impl Drop for ToolProcess {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        let mut child = lock_child(&self.child);
        // Already-exited children make kill fail; wait still reaps them.
        let _ = child.kill();
        if let Err(e) = child.wait() {
            log::warn!("Failed to reap {}: {}", self.command, e);
        }
    }
}

/// Kills a running invocation. Reaping is left to the owning [`ToolProcess`].
#[derive(Clone)]
pub struct ProcessKiller {
    child: Arc<Mutex<Child>>,
    command: String,
}

impl ProcessKiller {
    pub fn kill(&self) {
        log::debug!("Killing {}", self.command);
        if let Err(e) = lock_child(&self.child).kill() {
            log::debug!("Failed to kill {}: {}", self.command, e);
        }
    }
}

fn lock_child(child: &Mutex<Child>) -> MutexGuard<'_, Child> {
    child.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::io::Read;
    use std::os::unix::fs::PermissionsExt;

    use tempfile::TempDir;

    use super::*;

    fn script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("tool.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_passes_root_path_and_flags() {
        let dir = TempDir::new().unwrap();
        let tool = CatalogTool::new(script(&dir, r#"echo "$@""#), "/data/roms");

        let mut process = tool.list_xml(&Prefix::wildcard("pa")).unwrap();
        let mut out = String::new();
        process.take_stdout().unwrap().read_to_string(&mut out).unwrap();
        process.finish().unwrap();

        assert_eq!(out.trim(), "-rootpath /data/roms -lx pa*");
    }

    #[test]
    fn test_non_zero_exit_is_error() {
        let dir = TempDir::new().unwrap();
        let tool = CatalogTool::new(script(&dir, "exit 3"), "/data");

        let process = tool.list_names().unwrap();
        let err = process.finish().unwrap_err();
        assert!(matches!(err, IndexError::ProcessExit { .. }));
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let tool = CatalogTool::new("/nonexistent/tool", "/data");
        let err = tool.list_names().err().expect("spawn should fail");
        assert!(matches!(err, IndexError::ProcessSpawn { .. }));
    }

    #[test]
    fn test_stdout_taken_once() {
        let dir = TempDir::new().unwrap();
        let tool = CatalogTool::new(script(&dir, "true"), "/data");

        let mut process = tool.list_names().unwrap();
        assert!(process.take_stdout().is_ok());
        assert!(process.take_stdout().is_err());
        process.finish().unwrap();
    }

    #[test]
    fn test_drop_kills_running_child() {
        let dir = TempDir::new().unwrap();
        let tool = CatalogTool::new(script(&dir, "sleep 30"), "/data");

        let start = std::time::Instant::now();
        let process = tool.list_names().unwrap();
        drop(process);
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_killer_ends_blocked_read() {
        let dir = TempDir::new().unwrap();
        let tool = CatalogTool::new(script(&dir, "exec sleep 30"), "/data");

        let start = std::time::Instant::now();
        let mut process = tool.list_names().unwrap();
        let mut stdout = process.take_stdout().unwrap();
        let killer = process.killer();
        let reader = std::thread::spawn(move || {
            let mut out = String::new();
            stdout.read_to_string(&mut out).map(|_| out)
        });

        killer.kill();
        assert_eq!(reader.join().unwrap().unwrap(), "");
        assert!(process.finish().is_err());
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
    }
}
