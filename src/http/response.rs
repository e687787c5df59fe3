use std::collections::HashMap;

/// HTTP status codes the server can produce.
///
/// - `Ok` (200): File found and read
/// - `BadRequest` (400): Malformed request, only under the `BadRequest` policy
/// - `NotFound` (404): Missing, a directory, or outside the document root
/// - `MethodNotAllowed` (405): Non-GET method under the `GetOnly` policy
/// - `InternalServerError` (500): File exists but could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use localserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body as raw bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use localserve::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// assert_eq!(response.headers["Content-Length"], "2");
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Content-Length is always derived from the body, replacing any value
    /// set by hand, so the header can never disagree with the bytes sent.
    pub fn build(mut self) -> Response {
        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Headers every response from this server carries.
fn base(status: StatusCode, content_type: &str) -> ResponseBuilder {
    ResponseBuilder::new(status)
        .header("Content-Type", content_type)
        .header("Connection", "close")
        .header("Access-Control-Allow-Origin", "*")
}

impl Response {
    /// 200 OK carrying file bytes verbatim.
    pub fn file(content_type: &str, body: Vec<u8>) -> Self {
        base(StatusCode::Ok, content_type).body(body).build()
    }

    /// 404 naming the path that was requested.
    pub fn not_found(path: &str) -> Self {
        base(StatusCode::NotFound, "text/plain")
            .body(format!("File not found: {path}").into_bytes())
            .build()
    }

    /// 500 describing why an existing file could not be read.
    pub fn internal_error(cause: impl std::fmt::Display) -> Self {
        base(StatusCode::InternalServerError, "text/plain")
            .body(format!("Error reading file: {cause}").into_bytes())
            .build()
    }

    pub fn bad_request() -> Self {
        base(StatusCode::BadRequest, "text/plain")
            .body(b"400 Bad Request".to_vec())
            .build()
    }

    pub fn method_not_allowed(method: &str) -> Self {
        base(StatusCode::MethodNotAllowed, "text/plain")
            .header("Allow", "GET")
            .body(format!("Method not allowed: {method}").into_bytes())
            .build()
    }
}
