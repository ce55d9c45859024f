#[cfg(test)]
#[path = "process_test.rs"]
mod tests;

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::models::ServiceController;
use crate::domain::models::ServiceError;

/// Runs `<command> start|stop` as a detached child whose combined output is
/// appended to the service log.
pub struct ProcessService {
    command: String,
    log_path: PathBuf,
}

impl ProcessService {
    pub fn new(command: &str, log_path: &Path) -> ProcessService {
        return ProcessService {
            command: command.to_string(),
            log_path: log_path.to_path_buf(),
        };
    }

    fn open_log(&self) -> Result<(fs::File, fs::File), ServiceError> {
        let to_err = |source| {
            return ServiceError::Log {
                path: self.log_path.clone(),
                source,
            };
        };

        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(to_err)?;
            }
        }

        let stdout = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(to_err)?;
        let stderr = stdout.try_clone().map_err(to_err)?;

        return Ok((stdout, stderr));
    }

    fn spawn(&self, subcommand: &str) -> Result<(), ServiceError> {
        let (stdout, stderr) = self.open_log()?;

        let child = Command::new(&self.command)
            .arg(subcommand)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn();

        match child {
            Ok(child) => {
                tracing::debug!(
                    command = %self.command,
                    subcommand = subcommand,
                    pid = ?child.id(),
                    "Spawned service command"
                );
                return Ok(());
            }
            Err(source) => {
                tracing::error!(
                    command = %self.command,
                    subcommand = subcommand,
                    error = ?source,
                    "Failed to spawn service command"
                );
                return Err(ServiceError::Spawn {
                    command: self.command.to_string(),
                    subcommand: subcommand.to_string(),
                    source,
                });
            }
        }
    }
}

#[async_trait]
impl ServiceController for ProcessService {
    #[allow(clippy::implicit_return)]
    async fn start(&self) -> Result<(), ServiceError> {
        return self.spawn("start");
    }

    #[allow(clippy::implicit_return)]
    async fn stop(&self) -> Result<(), ServiceError> {
        return self.spawn("stop");
    }
}
