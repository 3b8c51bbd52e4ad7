// src/crawl/links.rs
// =============================================================================
// Link extraction: raw page bytes in, sorted same-origin URLs out.
//
// We use the `scraper` crate to parse the HTML (it never fails, broken
// markup just produces a best-effort tree) and the `url` crate to resolve
// each href against the crawl's origin.
//
// Important details:
// - hrefs are resolved against the ORIGIN of the start URL
//   (e.g. "https://example.com/"), not against the page they were found on
// - the result is a BTreeSet, so it is sorted and has no duplicates
// - URLs already in the visited set are left out, but the set itself is
//   only read here, never written
// =============================================================================

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

use super::visited::VisitedSet;
use crate::config::OriginPolicy;

// Every <a> element that carries an href attribute
static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("constant selector is valid"));

/// The origin (scheme + host + port) of a crawl plus the rule for matching it.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    // Origin as a URL with an empty path, used as the join base
    base: Url,
    // Origin as a string without trailing slash, e.g. "https://example.com"
    origin: String,
    policy: OriginPolicy,
}

impl LinkExtractor {
    /// Builds an extractor for the origin of `start_url`.
    ///
    /// Returns None if the URL has no tuple origin (e.g. `data:` or `file:` URLs).
    pub fn for_start_url(start_url: &Url, policy: OriginPolicy) -> Option<Self> {
        let origin = start_url.origin();
        if !origin.is_tuple() {
            return None;
        }
        let origin = origin.ascii_serialization();
        let base = Url::parse(&origin).ok()?;

        Some(Self {
            base,
            origin,
            policy,
        })
    }

    /// The crawl origin, e.g. "https://example.com"
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns every same-origin URL linked from `raw` that is not yet visited.
    pub fn extract(&self, raw: &[u8], visited: &VisitedSet) -> BTreeSet<String> {
        let html = String::from_utf8_lossy(raw);
        let document = Html::parse_document(&html);

        document
            .select(&ANCHORS)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| self.resolve(href))
            .filter(|url| !visited.contains(url))
            .collect()
    }

    // Resolves one href and keeps it only if it belongs to the crawl origin
    fn resolve(&self, href: &str) -> Option<String> {
        let url = self.base.join(href.trim()).ok()?;

        let same_origin = match self.policy {
            OriginPolicy::Structural => url.origin() == self.base.origin(),
            OriginPolicy::Prefix => url.as_str().starts_with(&self.origin),
        };

        same_origin.then(|| url.into())
    }
}
