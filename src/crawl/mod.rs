// src/crawl/mod.rs
// =============================================================================
// The crawl engine.
//
// Submodules, leaves first:
// - visited: the dedup authority (every URL ever dispatched)
// - links: same-origin link extraction from raw HTML
// - frontier: per-level admission of candidate URLs
// - fetch: the bounded-concurrency fetch pool and the transport trait
// - engine: the depth-barrier orchestration loop
// - mock: an in-memory transport for tests
// =============================================================================

mod engine;
mod fetch;
mod frontier;
mod links;
pub mod mock;
mod visited;

pub use engine::{sort_records, CrawlRecord, Crawler};
pub use fetch::{FetchOutcome, FetchPool, Fetcher, HttpFetcher};
pub use frontier::{CrawlTask, Frontier};
pub use links::LinkExtractor;
pub use visited::VisitedSet;
