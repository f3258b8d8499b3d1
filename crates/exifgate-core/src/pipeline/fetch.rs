//! Remote image retrieval.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Url;
use std::time::{Duration, Instant};

use super::retry::{backoff_duration, is_retryable};
use crate::config::FetchConfig;
use crate::error::FetchError;

/// Retrieves the bytes behind a URL.
///
/// Uses `async_trait` so the lookup can hold a `dyn ResourceFetcher`.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP(S) fetcher with timeout, body size limit and retries.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn max_body_bytes(&self) -> u64 {
        self.config.max_body_mb.saturating_mul(1024 * 1024)
    }

    async fn fetch_once(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let max_bytes = self.max_body_bytes();
        let too_large = FetchError::TooLarge {
            max_mb: self.config.max_body_mb,
        };
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(too_large);
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.classify(e))?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = parse_http_url(url)?;
        let start = Instant::now();
        let mut attempt = 0;

        loop {
            match self.fetch_once(&url).await {
                Ok(body) => {
                    tracing::debug!(
                        "Fetched {} ({} bytes) in {:?}",
                        url,
                        body.len(),
                        start.elapsed()
                    );
                    return Ok(body);
                }
                Err(e) if attempt < self.config.retry_attempts && is_retryable(&e) => {
                    let delay = backoff_duration(attempt, self.config.retry_delay_ms);
                    tracing::warn!(
                        "Fetch of {} failed ({}), retrying in {:?} ({}/{})",
                        url,
                        e,
                        delay,
                        attempt + 1,
                        self.config.retry_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Parse `url`, accepting only `http` and `https`.
fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(FetchError::InvalidUrl(url.to_string())),
    }
}
