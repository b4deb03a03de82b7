//! HTTP client wrapper used by the crawler and the archive extractor.
//!
//! A thin layer over `reqwest` that pins down the things every request in
//! this workspace needs: a fixed user agent, a request timeout, and uniform
//! error mapping. Callers choose between a fully-buffered body
//! ([`HttpClient::get_bytes`]) and a chunked stream
//! ([`HttpClient::get_stream`]) — the tar extraction path must never hold a
//! whole decompressed archive in memory, so it consumes the stream form.

use crate::error::{CoreError, Result};
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::time::Duration;

const USER_AGENT: &str = concat!("pypigraph/", env!("CARGO_PKG_VERSION"));

/// A network stall on a single package blocks the crawl on that package;
/// the timeout bounds how long.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for index pages and archive downloads.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Creates a client with the workspace user agent and a 30 second
    /// request timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }

    /// Issues a GET and reads the body fully into memory.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Http`] on network failure and
    /// [`CoreError::Status`] on a non-2xx response.
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self.send(url).await?;
        response.bytes().await.map_err(|e| CoreError::http(url, e))
    }

    /// Issues a GET and decodes the body as text.
    ///
    /// Index listing pages are declared ASCII-shaped by the regexes that
    /// consume them, so lossy UTF-8 conversion is sufficient here.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let bytes = self.get_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Issues a GET and returns the body as a stream of chunks.
    ///
    /// Chunk items carry the transport errors that occur mid-body; the
    /// status line is checked before the stream is handed out.
    pub async fn get_stream(&self, url: &str) -> Result<BoxStream<'static, reqwest::Result<Bytes>>> {
        let response = self.send(url).await?;
        Ok(response.bytes_stream().boxed())
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::http(url, e))?;

        if !response.status().is_success() {
            return Err(CoreError::Status {
                url: url.to_owned(),
                status: response.status(),
            });
        }

        Ok(response)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
