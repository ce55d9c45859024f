use std::io;
use std::path::PathBuf;

/// Failures talking to the inference service. Every variant is recoverable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("could not reach the inference service: {0}")]
    Transport(String),
    #[error("the inference service took too long to respond")]
    Timeout,
    #[error("the inference service responded with status {0}")]
    Status(u16),
    #[error("malformed response from the inference service: {reason}")]
    Protocol { line: String, reason: String },
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return BackendError::Timeout;
        }

        if let Some(status) = err.status() {
            return BackendError::Status(status.as_u16());
        }

        if err.is_decode() {
            return BackendError::Protocol {
                line: "".to_string(),
                reason: err.to_string(),
            };
        }

        return BackendError::Transport(err.to_string());
    }
}

/// The service process could not be launched.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to open service log {}: {source}", path.display())]
    Log { path: PathBuf, source: io::Error },
    #[error("failed to run `{command} {subcommand}`: {source}")]
    Spawn {
        command: String,
        subcommand: String,
        source: io::Error,
    },
}

/// The only condition that ends a session on its own.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("the inference service at {url} is still unreachable after trying to start it")]
    Unreachable { url: String },
}
