//! Error types surfaced to callers.
//!
//! Per-connection failures never reach these types: they end as a status
//! response or a silent close inside the connection task.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring the server up. Returned synchronously from `start`.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server is already running")]
    AlreadyRunning,

    #[error("document root {path} is not accessible: {source}")]
    DocumentRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("document root {path} is not a directory")]
    NotADirectory { path: PathBuf },
}

impl StartError {
    /// True when the port is taken by another socket.
    pub fn is_addr_in_use(&self) -> bool {
        matches!(self, StartError::Bind { source, .. } if source.kind() == io::ErrorKind::AddrInUse)
    }
}

/// Failure to assemble a [`crate::config::ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
