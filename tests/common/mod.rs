#![allow(dead_code)]

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use localserve::{ServerConfig, ServerHandle};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Not valid UTF-8 on purpose.
pub const PNG_FIXTURE: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0xff, 0xfe, 0x80,
    0xc3, 0x28,
];

/// Document root with `index.html`, `app.js`, `icon.png` and a `sub/` dir.
pub fn fixture_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.html", b"<html>ok</html>");
    write(dir.path(), "app.js", b"console.log(1)");
    write(dir.path(), "icon.png", PNG_FIXTURE);
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    write(dir.path(), "sub/style.css", b"body { margin: 0; }");
    dir
}

pub fn write(root: &Path, rel: &str, contents: &[u8]) {
    std::fs::write(root.join(rel), contents).unwrap();
}

pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig::new(0, root).with_shutdown_grace(Duration::from_millis(200))
}

pub async fn start(config: ServerConfig) -> ServerHandle {
    localserve::start(config).await.unwrap()
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }
}

/// Sends raw bytes and returns everything the server wrote before closing.
pub async fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    // Half-close so an empty request is seen as EOF rather than a stall.
    stream.shutdown().await.unwrap();

    let mut out = Vec::new();
    match tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut out)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionReset => {}
        Ok(Err(e)) => panic!("read failed: {e}"),
        Err(_) => panic!("server did not close the connection"),
    }
    out
}

pub async fn request(addr: SocketAddr, method: &str, path: &str) -> RawResponse {
    let raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
    parse_response(&send_raw(addr, raw.as_bytes()).await)
}

pub async fn get(addr: SocketAddr, path: &str) -> RawResponse {
    request(addr, "GET", path).await
}

pub fn parse_response(bytes: &[u8]) -> RawResponse {
    let split = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = std::str::from_utf8(&bytes[..split]).unwrap();
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap();
    let mut parts = status_line.splitn(3, ' ');
    assert_eq!(parts.next(), Some("HTTP/1.1"));
    let status = parts.next().unwrap().parse().unwrap();

    let headers = lines
        .map(|line| {
            let (k, v) = line.split_once(": ").unwrap();
            (k.to_string(), v.to_string())
        })
        .collect();

    RawResponse {
        status,
        headers,
        body: bytes[split + 4..].to_vec(),
    }
}
