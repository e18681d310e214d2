//! Blocking HTTP transport for the `crust-store` server.
//!
//! Must not be called from inside an async runtime worker thread: the
//! blocking client drives its own runtime.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::{
    DeleteManyRequest, EntryQuery, ExpireRequest, ExpireResponse, KeysQuery, KeysResponse,
};
use crate::transport::StoreTransport;

// == HTTP Transport ==
/// Speaks the store server's REST API.
///
/// Connection handling belongs to the underlying client; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the server at `base_url` (e.g. `http://127.0.0.1:6380`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url, None)
    }

    /// Same as [`HttpTransport::new`], with a per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::build(base_url, Some(timeout))
    }

    fn build(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(unavailable)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Maps a client-side failure (connect, timeout, body) to `BackendUnavailable`.
fn unavailable(err: reqwest::Error) -> CacheError {
    CacheError::BackendUnavailable(err.to_string())
}

/// Passes 2xx through. The store rejecting a request (4xx, e.g. 413 for an
/// oversized value) is `InvalidRequest`; any other status is `BackendUnavailable`.
fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = format!(
        "store responded with {}: {}",
        status,
        response.text().unwrap_or_default()
    );
    if status.is_client_error() {
        Err(CacheError::InvalidRequest(message))
    } else {
        Err(CacheError::BackendUnavailable(message))
    }
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    ensure_success(response)?.json().map_err(unavailable)
}

impl StoreTransport for HttpTransport {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get(self.url("/entries"))
            .query(&EntryQuery::new(key))
            .send()
            .map_err(unavailable)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(key, "store miss");
            return Ok(None);
        }

        let bytes = ensure_success(response)?.bytes().map_err(unavailable)?;
        Ok(Some(bytes.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8], ttl_ms: Option<u64>) -> Result<()> {
        let response = self
            .client
            .put(self.url("/entries"))
            .query(&EntryQuery::new(key).with_ttl(ttl_ms))
            .body(value.to_vec())
            .send()
            .map_err(unavailable)?;

        ensure_success(response)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/entries"))
            .query(&EntryQuery::new(key))
            .send()
            .map_err(unavailable)?;

        ensure_success(response)?;
        Ok(())
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.url("/entries/delete"))
            .json(&DeleteManyRequest {
                keys: keys.to_vec(),
            })
            .send()
            .map_err(unavailable)?;

        ensure_success(response)?;
        Ok(())
    }

    fn scan_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.url("/keys"))
            .query(&KeysQuery {
                prefix: prefix.to_string(),
            })
            .send()
            .map_err(unavailable)?;

        let body: KeysResponse = read_json(response)?;
        Ok(body.keys)
    }

    fn expire(&self, key: &str, ttl_ms: u64) -> Result<bool> {
        let response = self
            .client
            .post(self.url("/entries/expire"))
            .json(&ExpireRequest {
                key: key.to_string(),
                ttl_ms,
            })
            .send()
            .map_err(unavailable)?;

        let body: ExpireResponse = read_json(response)?;
        Ok(body.updated)
    }
}
