use crate::http::request::{Method, Request};
use std::collections::HashMap;

/// Upper bound on the request head read from a connection.
pub const MAX_HEAD_SIZE: usize = 8 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Empty request line or fewer than two tokens
    InvalidRequest,
    /// Request head is not valid UTF-8
    InvalidEncoding,
    /// Head grew past [`MAX_HEAD_SIZE`] without a terminator
    TooLarge,
    /// No header terminator yet
    Incomplete,
}

/// Parses a complete request head from `buf`.
///
/// Returns the request and the number of bytes consumed (head plus the
/// blank line). Request bodies are never consumed.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let Some(headers_end) = find_headers_end(buf) else {
        if buf.len() >= MAX_HEAD_SIZE {
            return Err(ParseError::TooLarge);
        }
        return Err(ParseError::Incomplete);
    };

    let head = std::str::from_utf8(&buf[..headers_end])
        .map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines = head.split("\r\n");
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut request = parse_request_line(request_line)?;

    // Lenient: lines without a colon are skipped rather than rejected.
    for line in lines {
        if let Some((key, value)) = line.split_once(':') {
            request
                .headers
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    Ok((request, headers_end + 4))
}

/// Parses a head that arrived without its terminating blank line.
///
/// Only the first line is consulted, so headers still in flight (or cut
/// off by the peer closing) do not hold up the response.
pub fn parse_partial_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::InvalidRequest);
    }
    let line_end = find_line_end(buf).unwrap_or(buf.len());
    let request_line =
        std::str::from_utf8(&buf[..line_end]).map_err(|_| ParseError::InvalidEncoding)?;
    parse_request_line(request_line)
}

/// Whether `buf` holds the whole request line.
pub fn has_request_line(buf: &[u8]) -> bool {
    find_line_end(buf).is_some()
}

/// Splits `METHOD PATH [VERSION]`.
pub fn parse_request_line(line: &str) -> Result<Request, ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().map(str::to_string);

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        version,
        headers: HashMap::new(),
    })
}

fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
