// src/crawl/fetch.rs
// =============================================================================
// The fetch pool: one HTTP GET per URL under a global concurrency ceiling.
//
// Key behaviour:
// - at most `max_concurrency` requests are in flight at once (a tokio
//   Semaphore hands out the permits)
// - every request gets the same per-request timeout
// - ANY failure (timeout, connection error, broken body) is logged as a
//   warning and becomes `None` for that URL; nothing is ever raised
// - a batch reports outcomes as they complete, NOT in submission order
//
// The transport itself sits behind the `Fetcher` trait so tests can swap
// in `MockFetcher` instead of the real reqwest client.
// =============================================================================

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::frontier::CrawlTask;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError};

/// A transport that can GET a URL and return the whole body.
///
/// Implementations must allow many concurrent `get` calls sharing one
/// connection pool.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the raw response body.
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// Releases the transport. Called once, after the last batch of a crawl.
    async fn close(&self) {}
}

/// The built-in transport: a single shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Builds the shared client from the crawl configuration.
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(CrawlError::Client)?;

        Ok(Self::from_client(client, config.request_timeout))
    }

    /// Wraps an already configured client (proxy settings, TLS roots...).
    pub fn from_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        // The status code is deliberately ignored: a 404 page is still content
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(e, self.timeout))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| categorize_error(e, self.timeout))?;

        Ok(body.to_vec())
    }

    async fn close(&self) {
        // reqwest closes idle connections when the last client handle drops
        debug!("Closing HTTP session");
    }
}

fn categorize_error(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Http(error)
    }
}

/// The result of fetching one task: the body, or None if the fetch failed.
#[derive(Debug)]
pub struct FetchOutcome {
    pub task: CrawlTask,
    pub content: Option<Vec<u8>>,
}

/// Bounded-concurrency executor over a shared `Fetcher`.
pub struct FetchPool {
    fetcher: Arc<dyn Fetcher>,
    permits: Arc<Semaphore>,
    max_concurrency: usize,
    request_timeout: Duration,
}

impl FetchPool {
    pub fn new(fetcher: Arc<dyn Fetcher>, max_concurrency: usize, request_timeout: Duration) -> Self {
        // A pool without permits would never make progress
        let max_concurrency = max_concurrency.max(1);

        Self {
            fetcher,
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            request_timeout,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetches one URL. Failures are logged and returned as None.
    pub async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        debug!(url, "Fetching");

        // The permit is held until the body is read or the request fails
        let Ok(_permit) = self.permits.acquire().await else {
            warn!(url, "Fetch pool is closed");
            return None;
        };

        let result = match tokio::time::timeout(self.request_timeout, self.fetcher.get(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.request_timeout)),
        };

        match result {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url, error = %e, "Fetch failed");
                None
            }
        }
    }

    /// Fetches a whole batch, yielding each outcome as soon as it completes.
    pub fn fetch_batch(&self, tasks: Vec<CrawlTask>) -> impl Stream<Item = FetchOutcome> + Send + '_ {
        stream::iter(tasks)
            .map(move |task| async move {
                let content = self.fetch(&task.url).await;
                FetchOutcome { task, content }
            })
            .buffer_unordered(self.max_concurrency)
    }

    /// Closes the underlying transport.
    pub async fn close(&self) {
        self.fetcher.close().await;
    }
}

impl std::fmt::Debug for FetchPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchPool")
            .field("max_concurrency", &self.max_concurrency)
            .field("available_permits", &self.permits.available_permits())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
