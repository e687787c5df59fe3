use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{Instant, timeout, timeout_at};

use crate::config::{MalformedPolicy, MethodPolicy, ServerConfig};
use crate::fs::resolver::{ResolvedFile, resolve};
use crate::http::parser::{
    MAX_HEAD_SIZE, ParseError, has_request_line, parse_http_request, parse_partial_request,
};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// How long to keep discarding request bytes after responding early.
const LINGER: Duration = Duration::from_millis(500);

/// One accepted client, serving exactly one request.
pub struct Connection<S> {
    stream: S,
    peer: String,
    buffer: BytesMut,
    state: ConnectionState,
    config: Arc<ServerConfig>,
    /// Set when the response went out before the full head was read.
    head_unread: bool,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

/// What reading the request head produced.
enum ReadOutcome {
    Request(Request),
    Malformed(ParseError),
    /// Peer closed before sending anything.
    Empty,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// `config.document_root` must already be canonical.
    pub fn new(stream: S, peer: impl Into<String>, config: Arc<ServerConfig>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            buffer: BytesMut::with_capacity(1024),
            state: ConnectionState::Reading,
            config,
            head_unread: false,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Drives the connection to `Closed`.
    ///
    /// The stream is shut down whether or not an error occurred.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;
        self.state = ConnectionState::Closed;
        let _ = self.stream.shutdown().await;
        if self.head_unread {
            self.discard_input().await;
        }
        result
    }

    /// Reads and drops what the client is still sending, so closing with
    /// unread bytes does not reset the connection under the response.
    async fn discard_input(&mut self) {
        let mut sink = [0u8; 1024];
        let _ = timeout(LINGER, async {
            while let Ok(n) = self.stream.read(&mut sink).await {
                if n == 0 {
                    break;
                }
            }
        })
        .await;
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Empty => ConnectionState::Closed,
                        ReadOutcome::Malformed(e) => {
                            tracing::debug!(peer = %self.peer, error = ?e, "Malformed request");
                            match self.config.malformed_policy {
                                MalformedPolicy::Close => ConnectionState::Closed,
                                MalformedPolicy::BadRequest => ConnectionState::Writing(
                                    ResponseWriter::new(&Response::bad_request()),
                                ),
                            }
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.handle_request(&req).await;
                    tracing::debug!(
                        peer = %self.peer,
                        method = req.method.as_str(),
                        path = %req.path,
                        user_agent = req.header("User-Agent").unwrap_or("-"),
                        status = response.status.as_u16(),
                        bytes = response.body.len(),
                        "Serving request"
                    );
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer
                        .write_to_stream(&mut self.stream, self.config.write_timeout)
                        .await
                        .context("failed to write response")?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        let deadline = Instant::now() + self.config.read_timeout;

        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, _consumed)) => return Ok(ReadOutcome::Request(request)),
                // Request line is all that routing needs; don't wait for the rest.
                Err(ParseError::Incomplete) if has_request_line(&self.buffer) => {
                    self.head_unread = true;
                    return Ok(match parse_partial_request(&self.buffer) {
                        Ok(request) => ReadOutcome::Request(request),
                        Err(e) => ReadOutcome::Malformed(e),
                    });
                }
                Err(ParseError::Incomplete) => {}
                Err(e) => return Ok(ReadOutcome::Malformed(e)),
            }

            let mut temp = [0u8; 1024];
            let room = (MAX_HEAD_SIZE - self.buffer.len()).min(temp.len());
            let n = timeout_at(deadline, self.stream.read(&mut temp[..room]))
                .await
                .map_err(|_| {
                    anyhow::anyhow!("read timed out after {:?}", self.config.read_timeout)
                })??;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Empty);
                }
                // Peer closed mid request line: serve what arrived.
                return Ok(match parse_partial_request(&self.buffer) {
                    Ok(request) => ReadOutcome::Request(request),
                    Err(e) => ReadOutcome::Malformed(e),
                });
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }

    async fn handle_request(&self, req: &Request) -> Response {
        if self.config.method_policy == MethodPolicy::GetOnly && req.method != Method::GET {
            return Response::method_not_allowed(req.method.as_str());
        }

        let resolved = resolve(&req.path, &self.config.document_root, &self.config.index_file).await;
        if !resolved.exists {
            tracing::warn!(peer = %self.peer, path = %req.path, "File not found");
            return Response::not_found(&req.path);
        }

        file_response(&req.path, &resolved).await
    }
}

/// Reads a resolved file into a response.
///
/// A file removed after resolution is still a 404; any other read failure
/// is a 500.
async fn file_response(request_path: &str, resolved: &ResolvedFile) -> Response {
    match tokio::fs::read(&resolved.absolute_path).await {
        Ok(body) => Response::file(resolved.content_type, body),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %request_path, "File vanished before it could be read");
            Response::not_found(request_path)
        }
        Err(e) => {
            tracing::warn!(
                file = %resolved.absolute_path.display(),
                error = %e,
                "Failed to read file"
            );
            Response::internal_error(e)
        }
    }
}
