//! Configuration Module
//!
//! Loads store server and cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheBackend, MemoryCache, NullCache, RemoteCache};
use crate::error::{CacheError, Result};
use crate::transport::HttpTransport;

/// Port the store server listens on and caches connect to by default.
pub const DEFAULT_STORE_PORT: u16 = 6380;

/// Largest value the store server accepts by default (64 MiB).
pub const DEFAULT_MAX_VALUE_BYTES: usize = 64 * 1024 * 1024;

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// == Store Server Config ==
/// Store server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Largest accepted request body in bytes
    pub max_value_bytes: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 6380)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `MAX_VALUE_BYTES` - Largest accepted value in bytes (default: 64 MiB)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port),
            cleanup_interval: parse_or(&lookup, "CLEANUP_INTERVAL", defaults.cleanup_interval),
            max_value_bytes: parse_or(&lookup, "MAX_VALUE_BYTES", defaults.max_value_bytes),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_STORE_PORT,
            cleanup_interval: 1,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
        }
    }
}

// == Backend Kind ==
/// Which cache backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Memory,
    Remote,
    None,
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "remote" => Ok(Self::Remote),
            "none" | "null" => Ok(Self::None),
            other => Err(CacheError::InvalidRequest(format!(
                "unknown cache backend {:?}",
                other
            ))),
        }
    }
}

// == Cache Config ==
/// Cache configuration parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: BackendKind,
    /// Namespace prefix for every key
    pub prefix: String,
    /// Log value sizes and timings (networked backend)
    pub debug: bool,
    /// Base URL of the store server (networked backend)
    pub store_url: String,
    /// Per-request timeout for the store server, None = client default
    pub store_timeout: Option<Duration>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory`, `remote` or `none` (default: memory)
    /// - `CACHE_PREFIX` - Key namespace (default: empty)
    /// - `CACHE_DEBUG` - `1`/`true` to log value sizes (default: false)
    /// - `CACHE_STORE_URL` - Store server URL (default: http://127.0.0.1:6380)
    /// - `CACHE_STORE_TIMEOUT_MS` - Request timeout in milliseconds (default: none)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let backend = match lookup("CACHE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.backend,
        };

        Ok(Self {
            backend,
            prefix: lookup("CACHE_PREFIX").unwrap_or(defaults.prefix),
            debug: lookup("CACHE_DEBUG")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.debug),
            store_url: lookup("CACHE_STORE_URL").unwrap_or(defaults.store_url),
            store_timeout: lookup("CACHE_STORE_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis),
        })
    }

    // == Build ==
    /// Builds the configured backend.
    ///
    /// The remote backend does not connect here; the first operation does.
    pub fn build(&self) -> Result<Box<dyn CacheBackend>> {
        Ok(match self.backend {
            BackendKind::Memory => Box::new(MemoryCache::new(self.prefix.as_str())?),
            BackendKind::None => Box::new(NullCache::new()),
            BackendKind::Remote => {
                let transport = match self.store_timeout {
                    Some(timeout) => HttpTransport::with_timeout(self.store_url.as_str(), timeout)?,
                    None => HttpTransport::new(self.store_url.as_str())?,
                };
                Box::new(RemoteCache::new(transport, self.prefix.as_str())?.with_debug(self.debug))
            }
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            prefix: String::new(),
            debug: false,
            store_url: format!("http://127.0.0.1:{}", DEFAULT_STORE_PORT),
            store_timeout: None,
        }
    }
}
