//! A depth-bounded, breadth-first web crawl engine.
//!
//! Starting from one URL, the engine fetches every page of a depth level
//! concurrently (under a hard concurrency ceiling), waits for the whole
//! level to finish, and then moves on to the same-origin links it found.
//! It returns one [`CrawlRecord`] per fetched URL.
//!
//! ```no_run
//! # async fn demo() -> Result<(), level_crawler::CrawlError> {
//! use level_crawler::{sort_records, Crawler};
//!
//! let mut records = Crawler::new("https://example.com/", 2)?
//!     .with_transform(|raw: &[u8]| Ok::<_, std::convert::Infallible>(raw.len()))
//!     .run()
//!     .await?;
//! sort_records(&mut records);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawl;
pub mod error;

pub use config::{CrawlConfig, OriginPolicy, DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT};
pub use crawl::mock::MockFetcher;
pub use crawl::{sort_records, CrawlRecord, Crawler, Fetcher, HttpFetcher};
pub use error::{BoxError, CrawlError, FetchError};
