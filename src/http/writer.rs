use std::time::Duration;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Headers first in a fixed order, then anything else sorted by name.
const HEADER_ORDER: &[&str] = &[
    "Content-Type",
    "Content-Length",
    "Connection",
    "Access-Control-Allow-Origin",
];

pub fn serialize_response(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(256 + resp.body.len());

    // Status line
    buf.put_slice(
        format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            resp.status.as_u16(),
            resp.status.reason_phrase()
        )
        .as_bytes(),
    );

    let mut extra: Vec<_> = resp
        .headers
        .iter()
        .filter(|(k, _)| !HEADER_ORDER.contains(&k.as_str()))
        .collect();
    extra.sort();

    let ordered = HEADER_ORDER
        .iter()
        .filter_map(|name| resp.headers.get_key_value(*name));

    for (k, v) in ordered.chain(extra) {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf.put_slice(&resp.body);

    buf
}

/// A serialized response plus progress through it.
pub struct ResponseWriter {
    buffer: BytesMut,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// Writes the remaining bytes, giving up once `limit` elapses.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W, limit: Duration) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        timeout(limit, self.write_all(stream))
            .await
            .map_err(|_| anyhow::anyhow!("write timed out after {:?}", limit))?
    }

    async fn write_all<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
