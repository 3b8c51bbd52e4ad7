// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// There are two families of errors, and they are treated very differently:
//
// - FetchError: something went wrong talking to the network (timeout,
//   connection refused, broken body...). These are EXPECTED on the open web.
//   The fetch pool logs them and turns them into an "absent" outcome for
//   that one URL. They never reach the caller of `Crawler::run`.
//
// - CrawlError: the only errors `Crawler::run` can return. A failing
//   content transform is one of them and is fatal: the whole run stops and
//   no records are returned.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by caller-supplied content transforms.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A transport-level failure for a single URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request (including reading the body) exceeded the per-request timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// reqwest reported a connection, TLS, redirect or body error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport failure (used by non-reqwest fetchers)
    #[error("{0}")]
    Other(String),
}

/// Errors that abort a crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The start URL could not be parsed or has no host to crawl
    #[error("invalid start URL '{url}': {reason}")]
    InvalidStartUrl { url: String, reason: String },

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The shared HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The caller-supplied content transform failed on a page
    #[error("content transform failed for {url}: {source}")]
    Transform {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The crawl was cancelled through its cancellation token
    #[error("crawl cancelled at depth {depth}")]
    Cancelled { depth: usize },
}
