//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server side: one request per connection,
//! no keep-alive, bodies served as raw bytes.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine
//! - **`parser`**: Parses the request head from a byte buffer
//! - **`request`**: Request representation
//! - **`response`**: Response representation with builder pattern
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the request head (bounded by read timeout)
//!        └──────┬──────┘
//!               │ Request parsed        (malformed / empty → Closed, no bytes)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve path, read file (200 / 404 / 500)
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response (bounded by write timeout)
//!        └──────┬───────────┘
//!               │ Sent or failed
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
