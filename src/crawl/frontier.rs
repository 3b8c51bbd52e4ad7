// src/crawl/frontier.rs
// =============================================================================
// A frontier is the batch of URLs dispatched for one depth level.
//
// Admission walks the candidate list IN ORDER on the control path and asks
// the visited set about each URL. That sequential walk is what collapses a
// URL discovered by several pages of the previous level into one fetch.
// =============================================================================

use super::visited::VisitedSet;

/// A URL paired with the depth at which it was first discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth: usize,
}

/// The admitted tasks of a single depth level.
#[derive(Debug, Default)]
pub struct Frontier {
    depth: usize,
    tasks: Vec<CrawlTask>,
}

impl Frontier {
    /// Admits every candidate not seen before and tags it with `depth`.
    pub fn admit<I>(depth: usize, candidates: I, visited: &mut VisitedSet) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let tasks = candidates
            .into_iter()
            .filter(|url| visited.admit(url))
            .map(|url| CrawlTask { url, depth })
            .collect();

        Self { depth, tasks }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn into_tasks(self) -> Vec<CrawlTask> {
        self.tasks
    }
}
