// src/crawl/engine.rs
// =============================================================================
// The crawl orchestrator: a depth-bounded, breadth-first crawl.
//
// How it works, for each depth 0..=crawl_depth:
// 1. Admit this level's candidate URLs through the visited set, in order
// 2. Hand the admitted URLs to the fetch pool as ONE batch
// 3. Consume outcomes as they complete until the whole batch is done
//    (this is the depth barrier: nothing of level N+1 starts before)
// 4. For every page that came back: run the content transform, emit a
//    record, and collect its same-origin links as next-level candidates
// 5. After the last level, drop whatever candidates are left
//
// Failed fetches become records with `content: None`. A failing content
// transform is different: it stops the crawl and `run` returns the error
// without any records.
// =============================================================================

use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

use super::fetch::{FetchOutcome, FetchPool, Fetcher, HttpFetcher};
use super::frontier::Frontier;
use super::links::LinkExtractor;
use super::visited::VisitedSet;
use crate::config::CrawlConfig;
use crate::error::{BoxError, CrawlError};

/// One crawled URL: the depth it was dispatched at and its transformed content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlRecord<T> {
    pub depth: usize,
    pub url: String,
    /// None when the fetch failed
    pub content: Option<T>,
}

type Transform<T> = Box<dyn Fn(&[u8]) -> Result<T, BoxError> + Send + Sync>;

/// A single-use crawl engine. `run` consumes it.
pub struct Crawler<T> {
    start_url: String,
    crawl_depth: usize,
    links: LinkExtractor,
    pool: FetchPool,
    transform: Transform<T>,
    cancel: CancellationToken,
}

impl Crawler<Vec<u8>> {
    /// Crawls `start_url` with the default configuration and the built-in HTTP client.
    pub fn new(start_url: &str, crawl_depth: usize) -> Result<Self, CrawlError> {
        Self::from_config(CrawlConfig::new(start_url, crawl_depth))
    }

    /// Builds an engine backed by a fresh `HttpFetcher`.
    pub fn from_config(config: CrawlConfig) -> Result<Self, CrawlError> {
        // Reject bad input before building the HTTP client
        validate(&config)?;
        let fetcher = HttpFetcher::new(&config)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Builds an engine on top of any transport.
    ///
    /// Records carry the raw body until `with_transform` is applied.
    pub fn with_fetcher(config: CrawlConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self, CrawlError> {
        let start = validate(&config)?;

        let links = LinkExtractor::for_start_url(&start, config.origin_policy).ok_or_else(|| {
            CrawlError::InvalidStartUrl {
                url: config.start_url.clone(),
                reason: "URL has no origin".to_string(),
            }
        })?;

        Ok(Self {
            start_url: start.into(),
            crawl_depth: config.crawl_depth,
            links,
            pool: FetchPool::new(fetcher, config.max_concurrency, config.request_timeout),
            transform: Box::new(raw_bytes),
            cancel: CancellationToken::new(),
        })
    }
}

impl<T> Crawler<T> {
    /// Replaces the content transform.
    ///
    /// The transform runs on the control path for every successfully fetched
    /// page. If it returns an error the whole crawl fails.
    pub fn with_transform<U, F, E>(self, transform: F) -> Crawler<U>
    where
        F: Fn(&[u8]) -> Result<U, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Crawler {
            start_url: self.start_url,
            crawl_depth: self.crawl_depth,
            links: self.links,
            pool: self.pool,
            transform: Box::new(move |raw: &[u8]| -> Result<U, BoxError> {
                transform(raw).map_err(Into::into)
            }),
            cancel: self.cancel,
        }
    }

    /// Lets the caller stop the crawl from outside.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The canonical start URL (depth 0)
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// The crawl origin used for same-origin filtering
    pub fn origin(&self) -> &str {
        self.links.origin()
    }

    /// Runs the full crawl and releases the transport before returning.
    ///
    /// Records come back level by level; inside a level they are in
    /// completion order. Use `sort_records` for a canonical order.
    pub async fn run(self) -> Result<Vec<CrawlRecord<T>>, CrawlError> {
        info!(
            start_url = %self.start_url,
            depth = self.crawl_depth,
            max_concurrency = self.pool.max_concurrency(),
            "Starting crawl"
        );

        let result = self.crawl_levels().await;

        // Exactly once, whatever the outcome
        self.pool.close().await;

        if let Ok(records) = &result {
            let failed = records.iter().filter(|r| r.content.is_none()).count();
            info!(pages = records.len(), failed, "Crawl finished");
        }

        result
    }

    async fn crawl_levels(&self) -> Result<Vec<CrawlRecord<T>>, CrawlError> {
        let mut visited = VisitedSet::new();
        let mut candidates = vec![self.start_url.clone()];
        let mut records = Vec::new();

        for depth in 0..=self.crawl_depth {
            if self.cancel.is_cancelled() {
                return Err(CrawlError::Cancelled { depth });
            }

            let frontier = Frontier::admit(depth, std::mem::take(&mut candidates), &mut visited);
            info!(
                depth = frontier.depth(),
                urls = frontier.len(),
                visited = visited.len(),
                "Dispatching level"
            );

            // Links found on the last level are never fetched
            let last_level = depth == self.crawl_depth;

            let mut outcomes = std::pin::pin!(self.pool.fetch_batch(frontier.into_tasks()));
            loop {
                let outcome = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Err(CrawlError::Cancelled { depth }),
                    next = outcomes.next() => match next {
                        Some(outcome) => outcome,
                        None => break,
                    },
                };

                let FetchOutcome { task, content } = outcome;
                let content = match content {
                    Some(raw) => {
                        if !last_level {
                            candidates.extend(self.links.extract(&raw, &visited));
                        }
                        let value = (self.transform)(&raw).map_err(|source| CrawlError::Transform {
                            url: task.url.clone(),
                            source,
                        })?;
                        Some(value)
                    }
                    None => None,
                };

                records.push(CrawlRecord {
                    depth: task.depth,
                    url: task.url,
                    content,
                });
            }
        }

        Ok(records)
    }
}

impl<T> std::fmt::Debug for Crawler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crawler")
            .field("start_url", &self.start_url)
            .field("crawl_depth", &self.crawl_depth)
            .field("links", &self.links)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

/// Sorts records by (depth, url).
pub fn sort_records<T>(records: &mut [CrawlRecord<T>]) {
    records.sort_by(|a, b| (a.depth, &a.url).cmp(&(b.depth, &b.url)));
}

// Default transform: keep the body as it came off the wire
fn raw_bytes(raw: &[u8]) -> Result<Vec<u8>, BoxError> {
    Ok(raw.to_vec())
}

// Checks the config and returns the parsed start URL
fn validate(config: &CrawlConfig) -> Result<Url, CrawlError> {
    if config.max_concurrency == 0 {
        return Err(CrawlError::InvalidConfig(
            "max_concurrency must be at least 1".to_string(),
        ));
    }

    let invalid = |reason: String| CrawlError::InvalidStartUrl {
        url: config.start_url.clone(),
        reason,
    };

    let start = Url::parse(&config.start_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(start.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", start.scheme())));
    }

    Ok(start)
}
