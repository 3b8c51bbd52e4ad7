// src/crawl/visited.rs
// =============================================================================
// The set of every URL that has ever been admitted to a fetch batch.
//
// This is the single dedup authority of a crawl. Only the orchestrator's
// control path calls `admit` (never a fetch task), so `&mut self` is all
// the synchronisation it needs: the borrow checker guarantees nobody else
// can touch it while a frontier is being built.
// =============================================================================

use std::collections::HashSet;

/// URLs admitted to dispatch. Grows for the life of the crawl, never shrinks.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` and returns true if it was not seen before, false otherwise.
    pub fn admit(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
