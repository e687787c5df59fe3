//! Server configuration.
//!
//! A [`ServerConfig`] can be built in code, read from environment variables
//! or loaded from YAML. The listen address is always loopback; only the port
//! is configurable.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DOCUMENT_ROOT: &str = "dist";
pub const DEFAULT_INDEX_FILE: &str = "index.html";
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// How request methods other than GET are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodPolicy {
    /// Every method is served exactly like GET.
    #[default]
    Permissive,
    /// Anything but GET gets 405 Method Not Allowed.
    GetOnly,
}

/// What happens to a request whose request line cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedPolicy {
    /// Close the connection without sending anything.
    #[default]
    Close,
    /// Answer with 400 Bad Request, then close.
    BadRequest,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub document_root: PathBuf,
    pub index_file: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub shutdown_grace: Duration,
    pub method_policy: MethodPolicy,
    pub malformed_policy: MalformedPolicy,
}

/// On-disk shape; durations are milliseconds.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    port: u16,
    document_root: PathBuf,
    index_file: String,
    read_timeout_ms: u64,
    write_timeout_ms: u64,
    shutdown_grace_ms: u64,
    method_policy: MethodPolicy,
    malformed_policy: MalformedPolicy,
}

impl Default for FileConfig {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        Self {
            port: defaults.port,
            document_root: defaults.document_root,
            index_file: defaults.index_file,
            read_timeout_ms: defaults.read_timeout.as_millis() as u64,
            write_timeout_ms: defaults.write_timeout.as_millis() as u64,
            shutdown_grace_ms: defaults.shutdown_grace.as_millis() as u64,
            method_policy: defaults.method_policy,
            malformed_policy: defaults.malformed_policy,
        }
    }
}

impl From<FileConfig> for ServerConfig {
    fn from(file: FileConfig) -> Self {
        Self {
            port: file.port,
            document_root: file.document_root,
            index_file: file.index_file,
            read_timeout: Duration::from_millis(file.read_timeout_ms),
            write_timeout: Duration::from_millis(file.write_timeout_ms),
            shutdown_grace: Duration::from_millis(file.shutdown_grace_ms),
            method_policy: file.method_policy,
            malformed_policy: file.malformed_policy,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, DEFAULT_DOCUMENT_ROOT)
    }
}

impl ServerConfig {
    pub fn new(port: u16, document_root: impl Into<PathBuf>) -> Self {
        Self {
            port,
            document_root: document_root.into(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            method_policy: MethodPolicy::default(),
            malformed_policy: MalformedPolicy::default(),
        }
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn with_method_policy(mut self, policy: MethodPolicy) -> Self {
        self.method_policy = policy;
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    /// Loopback address for the configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }

    /// Reads `PORT`, `DOC_ROOT`, `READ_TIMEOUT_MS`, `WRITE_TIMEOUT_MS`,
    /// `METHOD_POLICY` and `MALFORMED_POLICY` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(port) = lookup("PORT") {
            cfg.port = parse_var("PORT", &port)?;
        }
        if let Some(root) = lookup("DOC_ROOT") {
            cfg.document_root = PathBuf::from(root);
        }
        if let Some(ms) = lookup("READ_TIMEOUT_MS") {
            cfg.read_timeout = Duration::from_millis(parse_var("READ_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = lookup("WRITE_TIMEOUT_MS") {
            cfg.write_timeout = Duration::from_millis(parse_var("WRITE_TIMEOUT_MS", &ms)?);
        }
        if let Some(policy) = lookup("METHOD_POLICY") {
            cfg.method_policy = parse_policy("METHOD_POLICY", &policy)?;
        }
        if let Some(policy) = lookup("MALFORMED_POLICY") {
            cfg.malformed_policy = parse_policy("MALFORMED_POLICY", &policy)?;
        }

        Ok(cfg)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = serde_yaml::from_str(yaml)?;
        Ok(file.into())
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Policies use the same kebab-case names in env vars as in YAML.
fn parse_policy<T: for<'de> Deserialize<'de>>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(value.trim()).map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
