//! In-memory `Fetcher` for tests.
//!
//! Serves canned bodies by exact URL and records every call, so tests can
//! assert on fetch counts, ordering and the number of requests in flight.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use super::fetch::Fetcher;
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum MockResponse {
    Body(Vec<u8>),
    Fail(String),
    Hang,
}

/// Mock transport with canned responses.
///
/// # Example
///
/// ```rust
/// use level_crawler::MockFetcher;
///
/// let mock = MockFetcher::new()
///     .with_page("https://example.com/", r#"<a href="/a">A</a>"#)
///     .with_failure("https://example.com/a");
/// assert_eq!(mock.fetch_count("https://example.com/"), 0);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    calls: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    close_calls: Arc<AtomicUsize>,
    delay: Duration,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    pub fn with_page(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, MockResponse::Body(body.into()));
        self
    }

    /// Fails every request for `url` with a transport error.
    pub fn with_failure(self, url: &str) -> Self {
        self.insert(url, MockResponse::Fail(format!("connection refused: {url}")));
        self
    }

    /// Never answers requests for `url`; only a timeout ends them.
    pub fn with_hang(self, url: &str) -> Self {
        self.insert(url, MockResponse::Hang);
        self
    }

    /// Adds a fixed latency to every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn insert(&self, url: &str, response: MockResponse) {
        self.responses
            .write()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Every URL requested so far, in the order requests started.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }

    /// Requests currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous requests observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

// Decrements the in-flight counter even when the request future is dropped
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(Arc::clone(&self.in_flight));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = self.responses.read().unwrap().get(url).cloned();
        match response {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Fail(message)) => Err(FetchError::Other(message)),
            Some(MockResponse::Hang) => {
                std::future::pending::<()>().await;
                unreachable!("pending never resolves")
            }
            None => Err(FetchError::Other(format!("no mock response for {url}"))),
        }
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}
