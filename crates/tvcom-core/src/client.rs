//! HTTP client with rate limiting for TV.com
//!
//! This module provides a rate-limited HTTP client that keeps the request
//! rate towards the catalog site in check and implements retry logic with
//! exponential backoff. It also defines [`DocumentFetch`], the seam between
//! the scraper and its transport.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{Result, TvComError};

/// Base URL for TV.com
pub const TVCOM_BASE_URL: &str = "http://www.tv.com";

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept-Language header
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.8";

/// Maximum number of retry attempts for transient errors
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_RETRY_DELAY_MS: u64 = 1000;

/// Resolves a URL to the raw markup of the document behind it.
///
/// Implemented by [`TvComClient`]; tests substitute fakes to exercise the
/// aggregation logic without a server.
pub trait DocumentFetch {
    /// Fetch the document at an absolute URL.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart. The
/// season fan-out bounds how many fetches are in flight; this limiter
/// additionally spaces their admission.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Arguments
    /// * `requests_per_second` - Maximum number of requests allowed per second
    ///
    /// # Example
    /// ```
    /// use tvcom_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(Instant::now() - min_interval)),
        }
    }

    /// Acquire permission to make a request
    ///
    /// This method will wait if necessary to ensure the minimum interval
    /// between requests is respected.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            sleep(wait_time).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the TV.com HTTP client and scraper
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the catalog site (default: `http://www.tv.com`)
    pub base_url: String,
    /// Maximum requests per second (default: 4.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: TVCOM_BASE_URL.to_string(),
            requests_per_second: 4.0,
            timeout_secs: 30,
        }
    }
}

/// HTTP client for TV.com with rate limiting and retry logic
///
/// This client automatically:
/// - Limits request rate to avoid server overload
/// - Retries on transient errors (429, 5xx) with exponential backoff
/// - Sets appropriate browser-like headers
pub struct TvComClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
}

impl TvComClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Arguments
    /// * `config` - Client configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    DEFAULT_ACCEPT_LANGUAGE.parse().unwrap(),
                );
                headers
            })
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::new(config.requests_per_second);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Fetch the raw markup behind an absolute URL
    ///
    /// This method handles rate limiting and retries automatically.
    ///
    /// # Errors
    /// - `TvComError::HttpError` - Network or HTTP error after all retries
    /// - `TvComError::RateLimited` - Server returned 429 after all retries
    /// - `TvComError::NotFound` - Server returned 404
    pub async fn fetch_url(&self, url: &str) -> Result<String> {
        self.fetch_with_retry(url, 0).await
    }

    /// Internal method to fetch with retry logic
    fn fetch_with_retry<'a>(
        &'a self,
        url: &'a str,
        attempt: u32,
    ) -> std::pin::Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            // Wait for rate limiter before making request
            self.rate_limiter.acquire().await;

            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }

            // 404 - Not Found (no retry)
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(TvComError::NotFound(url.to_string()));
            }

            // 429 - Rate Limited
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if attempt < MAX_RETRIES {
                    let delay = self.calculate_backoff_delay(attempt);
                    tracing::debug!(url, attempt, ?delay, "rate limited, backing off");
                    sleep(delay).await;
                    return self.fetch_with_retry(url, attempt + 1).await;
                }
                return Err(TvComError::RateLimited);
            }

            // 5xx - Server errors
            if status.is_server_error() {
                if attempt < MAX_RETRIES {
                    let delay = self.calculate_backoff_delay(attempt);
                    tracing::debug!(url, attempt, ?delay, "server error, backing off");
                    sleep(delay).await;
                    return self.fetch_with_retry(url, attempt + 1).await;
                }
                return Err(TvComError::HttpError(
                    response.error_for_status().unwrap_err(),
                ));
            }

            // Other errors - convert to HttpError
            Err(TvComError::HttpError(
                response.error_for_status().unwrap_err(),
            ))
        })
    }

    /// Calculate exponential backoff delay for retry
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: 1s, 2s, 4s, ...
        let delay_ms = BASE_RETRY_DELAY_MS * 2u64.pow(attempt);
        Duration::from_millis(delay_ms)
    }
}

impl DocumentFetch for TvComClient {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send {
        self.fetch_url(url)
    }
}
