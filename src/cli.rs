// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The CLI is a thin demo on top of the library: it turns flags into a
// CrawlConfig, runs one crawl and prints what came back.
// =============================================================================

use clap::Parser;
use level_crawler::{CrawlConfig, OriginPolicy, DEFAULT_MAX_CONCURRENCY};
use std::time::Duration;

// The whole CLI: one positional URL plus a handful of flags
#[derive(Parser, Debug)]
#[command(
    name = "level-crawler",
    version,
    about = "Crawl a website breadth-first, one depth level at a time",
    long_about = "level-crawler fetches a start page, then every same-origin page it links to, \
                  level by level, up to a fixed depth. Each level is fetched concurrently."
)]
pub struct Cli {
    /// Website URL to start crawling from (e.g., https://example.com)
    pub start_url: String,

    /// Deepest level to fetch (0 = just the start page)
    #[arg(long, default_value_t = 1)]
    pub depth: usize,

    /// Maximum number of requests in flight at once
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Match the origin by string prefix instead of scheme/host/port
    #[arg(long)]
    pub prefix_origin: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log every fetch (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    // Maps the flags onto the library's configuration
    pub fn crawl_config(&self) -> CrawlConfig {
        let policy = if self.prefix_origin {
            OriginPolicy::Prefix
        } else {
            OriginPolicy::Structural
        };

        CrawlConfig::new(self.start_url.clone(), self.depth)
            .with_max_concurrency(self.max_concurrency)
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_origin_policy(policy)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is there no subcommand enum?
//    - The tool only does one thing, so a flat struct is enough
//    - clap still generates --help and --version for us
//
// 2. What does default_value_t do?
//    - It uses a typed Rust value as the default (not a string)
//    - Here we reuse the library's DEFAULT_MAX_CONCURRENCY constant so
//      the CLI and the library can never disagree
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["level-crawler", "https://example.com"]);
        let config = cli.crawl_config();
        assert_eq!(config.crawl_depth, 1);
        assert_eq!(config.max_concurrency, 200);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.origin_policy, OriginPolicy::Structural);
        assert!(!cli.json);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "level-crawler",
            "https://example.com",
            "--depth",
            "3",
            "--max-concurrency",
            "8",
            "--timeout-secs",
            "5",
            "--prefix-origin",
            "--json",
        ]);
        let config = cli.crawl_config();
        assert_eq!(config.crawl_depth, 3);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.origin_policy, OriginPolicy::Prefix);
        assert!(cli.json);
    }
}
