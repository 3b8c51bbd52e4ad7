// src/config.rs
// =============================================================================
// Crawl configuration.
//
// The engine reads no files and no environment variables. Everything it
// needs is in this struct; the CLI fills it from command-line flags.
// =============================================================================

use std::time::Duration;

/// Default ceiling on in-flight requests
pub const DEFAULT_MAX_CONCURRENCY: usize = 200;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent by the built-in HTTP fetcher
pub const DEFAULT_USER_AGENT: &str = concat!("level-crawler/", env!("CARGO_PKG_VERSION"));

/// How "same origin" is decided for discovered links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginPolicy {
    /// Scheme, host and port of the link must equal those of the start URL
    #[default]
    Structural,
    /// The resolved link string must start with the start URL's origin string.
    ///
    /// This also admits hosts that merely share a prefix, e.g.
    /// `https://example.com.evil.org/` for an `https://example.com` crawl.
    Prefix,
}

/// Everything a crawl run needs to know up front.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Where the crawl starts (depth 0)
    pub start_url: String,
    /// Last depth that is fetched; the crawl dispatches `crawl_depth + 1` batches
    pub crawl_depth: usize,
    /// Maximum number of requests in flight at once (must be at least 1)
    pub max_concurrency: usize,
    /// Timeout applied to every single request, body included
    pub request_timeout: Duration,
    /// User-Agent header for the built-in HTTP fetcher
    pub user_agent: String,
    /// Same-origin filter for discovered links
    pub origin_policy: OriginPolicy,
}

impl CrawlConfig {
    /// Creates a config with the default concurrency, timeout and origin policy.
    pub fn new(start_url: impl Into<String>, crawl_depth: usize) -> Self {
        Self {
            start_url: start_url.into(),
            crawl_depth,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            origin_policy: OriginPolicy::default(),
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_origin_policy(mut self, origin_policy: OriginPolicy) -> Self {
        self.origin_policy = origin_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("https://example.com", 2);
        assert_eq!(config.crawl_depth, 2);
        assert_eq!(config.max_concurrency, 200);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.origin_policy, OriginPolicy::Structural);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CrawlConfig::new("https://example.com", 0)
            .with_max_concurrency(1)
            .with_request_timeout(Duration::from_millis(250))
            .with_origin_policy(OriginPolicy::Prefix);
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.origin_policy, OriginPolicy::Prefix);
    }
}
