use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::StartError;
use crate::http::connection::Connection;

const BACKLOG: u32 = 128;

/// Binds a listening socket with local address reuse enabled.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, StartError> {
    let bind_err = |source| StartError::Bind { addr, source };

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(bind_err)?;

    socket.set_reuseaddr(true).map_err(bind_err)?;
    socket.bind(addr).map_err(bind_err)?;
    socket.listen(BACKLOG).map_err(bind_err)
}

/// Accepts connections until `shutdown` fires, one task per connection.
///
/// On shutdown the listener is dropped first, so the port is released
/// before in-flight handlers are drained.
pub async fn run(
    listener: TcpListener,
    config: Arc<ServerConfig>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut handlers = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,

            accepted = listener.accept() => match accepted {
                Ok((socket, peer)) => {
                    debug!(%peer, active = handlers.len(), "Accepted connection");

                    let config = config.clone();
                    handlers.spawn(async move {
                        let mut conn = Connection::new(socket, peer.to_string(), config);
                        if let Err(e) = conn.run().await {
                            warn!(%peer, "Connection error: {:#}", e);
                        }
                    });
                }
                Err(e) => {
                    // Usually fd exhaustion; back off instead of spinning.
                    warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            },

            Some(_) = handlers.join_next(), if !handlers.is_empty() => {}
        }
    }

    drop(listener);
    info!("Listener closed");

    drain(handlers, config.shutdown_grace).await;
}

/// Waits up to `grace` for handlers to finish, then aborts the rest.
async fn drain(mut handlers: JoinSet<()>, grace: Duration) {
    if handlers.is_empty() {
        return;
    }

    let finished = tokio::time::timeout(grace, async {
        while handlers.join_next().await.is_some() {}
    })
    .await;

    if finished.is_err() {
        warn!(
            remaining = handlers.len(),
            "Aborting connection handlers after shutdown grace period"
        );
        handlers.shutdown().await;
    }
}
