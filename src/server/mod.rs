//! Server lifecycle.
//!
//! [`start`] validates the document root, binds the loopback port and spawns
//! the accept loop, returning a [`ServerHandle`] that owns all of it.
//! [`LocalServer`] wraps the handle for embedders that want a start/stop
//! object with a running guard.

pub mod listener;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use crate::config::ServerConfig;
use crate::error::StartError;

/// A running server. Stopping consumes the handle.
///
/// Dropping the handle without calling [`ServerHandle::stop`] aborts the
/// accept loop and every connection task, which releases the port.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

/// Starts serving `config.document_root` on `127.0.0.1:config.port`.
///
/// Port 0 binds an ephemeral port; read it back from
/// [`ServerHandle::local_addr`].
pub async fn start(mut config: ServerConfig) -> Result<ServerHandle, StartError> {
    let root = tokio::fs::canonicalize(&config.document_root)
        .await
        .map_err(|source| StartError::DocumentRoot {
            path: config.document_root.clone(),
            source,
        })?;

    let meta = tokio::fs::metadata(&root)
        .await
        .map_err(|source| StartError::DocumentRoot {
            path: root.clone(),
            source,
        })?;
    if !meta.is_dir() {
        return Err(StartError::NotADirectory { path: root });
    }
    config.document_root = root;

    let listener = listener::bind(config.listen_addr())?;
    let local_addr = listener.local_addr().map_err(|source| StartError::Bind {
        addr: config.listen_addr(),
        source,
    })?;

    info!(
        addr = %local_addr,
        root = %config.document_root.display(),
        "Listening"
    );

    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(listener::run(listener, Arc::new(config), shutdown_rx));

    Ok(ServerHandle {
        local_addr,
        shutdown,
        task: Some(task),
    })
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// URL an embedded WebView should load, e.g. `http://localhost:8080/`.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://localhost:{}/", self.local_addr.port()))
    }

    /// Stops accepting, drains in-flight connections within the configured
    /// grace period, and waits for the port to be released.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Accept loop ended abnormally");
            }
        }

        info!(addr = %self.local_addr, "Server stopped");
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = self.shutdown.send(true);
            task.abort();
        }
    }
}

/// Start/stop controller owning at most one running server.
pub struct LocalServer {
    config: ServerConfig,
    handle: Option<ServerHandle>,
}

impl LocalServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            handle: None,
        }
    }

    /// Starts the server, failing with [`StartError::AlreadyRunning`] if it
    /// is already up.
    pub async fn start(&mut self) -> Result<SocketAddr, StartError> {
        if self.handle.is_some() {
            return Err(StartError::AlreadyRunning);
        }

        let handle = start(self.config.clone()).await?;
        let addr = handle.local_addr();
        self.handle = Some(handle);
        Ok(addr)
    }

    /// Releases the port. No-op when not running.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop().await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}
