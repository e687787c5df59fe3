//! localserve - loopback static file server
//!
//! Serves a read-only asset bundle to an embedded WebView over
//! `http://localhost`, one request per connection.

pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod server;

pub use config::{MalformedPolicy, MethodPolicy, ServerConfig};
pub use error::{ConfigError, StartError};
pub use server::{LocalServer, ServerHandle, start};
