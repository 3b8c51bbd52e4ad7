// tests/crawl_scenarios.rs
// =============================================================================
// End-to-end crawl behaviour against the in-memory MockFetcher.
// =============================================================================

use level_crawler::{sort_records, CrawlConfig, CrawlError, CrawlRecord, Crawler, MockFetcher};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const START: &str = "https://example.com/";

fn url(path: &str) -> String {
    format!("https://example.com{path}")
}

fn crawler(depth: usize, mock: &MockFetcher) -> Crawler<Vec<u8>> {
    Crawler::with_fetcher(CrawlConfig::new(START, depth), Arc::new(mock.clone())).unwrap()
}

fn urls_at<T>(records: &[CrawlRecord<T>], depth: usize) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| r.depth == depth)
        .map(|r| r.url.clone())
        .collect()
}

#[tokio::test]
async fn test_failed_start_page_yields_single_empty_record() {
    let mock = MockFetcher::new().with_failure(START);

    let records = crawler(0, &mock).run().await.unwrap();

    assert_eq!(
        records,
        vec![CrawlRecord {
            depth: 0,
            url: START.to_string(),
            content: None,
        }]
    );
    assert_eq!(mock.calls(), vec![START.to_string()]);
    assert_eq!(mock.close_count(), 1);
}

#[tokio::test]
async fn test_duplicate_and_foreign_links_are_filtered() {
    let mock = MockFetcher::new()
        .with_page(
            START,
            r#"
            <a href="/a">A</a>
            <a href="/b">B</a>
            <a href="/a">A again</a>
            <a href="https://elsewhere.org/x">Foreign</a>
            "#,
        )
        .with_page(&url("/a"), "a")
        .with_page(&url("/b"), "b");

    let records = crawler(1, &mock).run().await.unwrap();

    assert_eq!(urls_at(&records, 1), BTreeSet::from([url("/a"), url("/b")]));
    assert_eq!(records.len(), 3);
    assert_eq!(mock.fetch_count("https://elsewhere.org/x"), 0);
}

#[tokio::test]
async fn test_back_link_to_start_is_not_refetched() {
    let mock = MockFetcher::new()
        .with_page(START, r#"<a href="/a">A</a>"#)
        .with_page(&url("/a"), r#"<a href="/">Home</a>"#);

    let records = crawler(2, &mock).run().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(mock.fetch_count(START), 1);
}

#[tokio::test]
async fn test_single_permit_serialises_fetches_and_keeps_the_barrier() {
    let level_one: Vec<String> = (1..=5).map(|i| url(&format!("/p{i}"))).collect();
    let start_html: String = level_one
        .iter()
        .map(|u| format!(r#"<a href="{u}">x</a>"#))
        .collect();

    let mut mock = MockFetcher::new()
        .with_delay(Duration::from_millis(10))
        .with_page(START, start_html)
        .with_page(&url("/deep"), "");
    for page in &level_one {
        mock = mock.with_page(page, r#"<a href="/deep">deeper</a>"#);
    }

    let config = CrawlConfig::new(START, 2).with_max_concurrency(1);
    let records = Crawler::with_fetcher(config, Arc::new(mock.clone()))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(mock.max_in_flight(), 1);
    assert_eq!(urls_at(&records, 1).len(), 5);
    assert_eq!(urls_at(&records, 2), BTreeSet::from([url("/deep")]));

    // Every level-1 fetch started before the level-2 fetch
    let calls = mock.calls();
    let deep_at = calls.iter().position(|c| *c == url("/deep")).unwrap();
    for page in &level_one {
        assert!(calls.iter().position(|c| c == page).unwrap() < deep_at);
    }
}

#[tokio::test]
async fn test_transform_error_aborts_the_crawl() {
    let mock = MockFetcher::new()
        .with_page(START, r#"<a href="/bad">Bad</a><a href="/good">Good</a>"#)
        .with_page(&url("/bad"), "poison")
        .with_page(&url("/good"), "fine");

    let result = crawler(1, &mock)
        .with_transform(|raw: &[u8]| {
            if raw == b"poison" {
                Err("refusing to parse poison")
            } else {
                Ok(raw.len())
            }
        })
        .run()
        .await;

    match result {
        Err(CrawlError::Transform { url: failed, .. }) => assert_eq!(failed, url("/bad")),
        other => panic!("expected a transform error, got {:?}", other),
    }
    assert_eq!(mock.close_count(), 1);
}

#[tokio::test]
async fn test_transform_is_not_applied_to_failed_fetches() {
    let mock = MockFetcher::new()
        .with_page(START, r#"<a href="/down">Down</a>"#)
        .with_failure(&url("/down"));

    let mut records = crawler(1, &mock)
        .with_transform(|raw: &[u8]| Ok::<_, std::convert::Infallible>(String::from_utf8_lossy(raw).len()))
        .run()
        .await
        .unwrap();
    sort_records(&mut records);

    assert_eq!(records[0].depth, 0);
    assert!(records[0].content.is_some());
    assert_eq!(
        records[1],
        CrawlRecord {
            depth: 1,
            url: url("/down"),
            content: None,
        }
    );
}

#[tokio::test]
async fn test_every_depth_is_present() {
    let mock = MockFetcher::new()
        .with_page(START, r#"<a href="/1">1</a>"#)
        .with_page(&url("/1"), r#"<a href="/2">2</a>"#)
        .with_page(&url("/2"), r#"<a href="/3">3</a>"#)
        .with_page(&url("/3"), r#"<a href="/4">4</a>"#);

    let records = crawler(3, &mock).run().await.unwrap();

    let depths: BTreeSet<usize> = records.iter().map(|r| r.depth).collect();
    assert_eq!(depths, BTreeSet::from([0, 1, 2, 3]));
    assert_eq!(mock.fetch_count(&url("/4")), 0);
}

#[tokio::test]
async fn test_no_url_is_fetched_twice() {
    // start -> a, b; a -> c, b; b -> c, a; c -> start, a
    let mock = MockFetcher::new()
        .with_page(START, r#"<a href="/a"></a><a href="/b"></a>"#)
        .with_page(&url("/a"), r#"<a href="/c"></a><a href="/b"></a>"#)
        .with_page(&url("/b"), r#"<a href="/c"></a><a href="/a"></a>"#)
        .with_page(&url("/c"), r#"<a href="/"></a><a href="/a"></a>"#);

    let records = crawler(4, &mock).run().await.unwrap();

    let calls = mock.calls();
    let unique: HashSet<&String> = calls.iter().collect();
    assert_eq!(calls.len(), unique.len());
    assert_eq!(records.len(), 4);

    // depth is the first-discovery depth
    assert_eq!(urls_at(&records, 1), BTreeSet::from([url("/a"), url("/b")]));
    assert_eq!(urls_at(&records, 2), BTreeSet::from([url("/c")]));
}

#[tokio::test]
async fn test_crawl_continues_past_empty_levels() {
    let mock = MockFetcher::new().with_page(START, "<p>no links</p>");

    let records = crawler(3, &mock).run().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(mock.close_count(), 1);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let mock = MockFetcher::new().with_page(START, "hello");
    let token = CancellationToken::new();
    token.cancel();

    let result = crawler(1, &mock).with_cancellation(token).run().await;

    assert!(matches!(result, Err(CrawlError::Cancelled { depth: 0 })));
    assert!(mock.calls().is_empty());
    assert_eq!(mock.close_count(), 1);
}

#[tokio::test]
async fn test_cancelled_while_a_fetch_hangs() {
    let mock = MockFetcher::new()
        .with_page(START, r#"<a href="/slow">Slow</a>"#)
        .with_hang(&url("/slow"));
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = crawler(1, &mock).with_cancellation(token).run().await;

    assert!(matches!(result, Err(CrawlError::Cancelled { depth: 1 })));
    assert_eq!(mock.in_flight(), 0);
}
