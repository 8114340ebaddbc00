use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::TransportError;

/// Fetches the raw bytes behind a resource locator.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the whole resource, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` when the resource cannot be read in time or the
    /// remote side answers with a non-success status.
    async fn fetch(&self, locator: &str, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

/// HTTP(S) transport backed by `reqwest`.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, locator: &str, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(locator)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| request_error(err, timeout))?;

        if !response.status().is_success() {
            return Err(TransportError::HttpStatus(response.status()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| request_error(err, timeout))?;
        Ok(body.to_vec())
    }
}

/// Timeouts are reported the same way for every transport.
fn request_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            secs: timeout.as_secs(),
        }
    } else {
        TransportError::Http(err)
    }
}

/// Reads local files, addressed by plain path or `file://` URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl FileTransport {
    fn path_for(locator: &str) -> PathBuf {
        Url::parse(locator)
            .ok()
            .filter(|url| url.scheme() == "file")
            .and_then(|url| url.to_file_path().ok())
            .unwrap_or_else(|| PathBuf::from(locator))
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn fetch(&self, locator: &str, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let path = Self::path_for(locator);
        tokio::time::timeout(timeout, tokio::fs::read(path))
            .await
            .map_err(|_| TransportError::Timeout {
                secs: timeout.as_secs(),
            })?
            .map_err(TransportError::from)
    }
}

/// True for locators that should go over HTTP.
#[must_use]
pub fn is_remote(locator: &str) -> bool {
    Url::parse(locator).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}
