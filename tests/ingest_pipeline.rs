// tests/ingest_pipeline.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use geo_ai_digest::digest::{render_html, EMPTY_DIGEST_HTML};
use geo_ai_digest::ingest::extract::{FallbackExtractor, CONTENT_NOT_AVAILABLE};
use geo_ai_digest::ingest::types::{FeedEntry, FeedReader, FeedSource, PageFetcher};
use geo_ai_digest::ingest::{ingest, IngestOptions};
use geo_ai_digest::relevance::RelevanceScorer;
use geo_ai_digest::select_top;

/// Feed URL → entries; URLs mapped to `None` fail.
struct MockReader {
    feeds: HashMap<String, Option<Vec<FeedEntry>>>,
}

#[async_trait]
impl FeedReader for MockReader {
    async fn read_feed(&self, source: &FeedSource) -> Result<Vec<FeedEntry>> {
        match self.feeds.get(&source.url) {
            Some(Some(v)) => Ok(v.clone()),
            _ => Err(anyhow!("connection refused")),
        }
    }
}

/// Serves a fixed page and counts requests.
struct CountingFetcher {
    body: Option<&'static str>,
    calls: AtomicUsize,
}

impl CountingFetcher {
    fn serving(body: &'static str) -> Self {
        Self {
            body: Some(body),
            calls: AtomicUsize::new(0),
        }
    }
    fn failing() -> Self {
        Self {
            body: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch_page(&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.body
            .map(|b| b.as_bytes().to_vec())
            .ok_or_else(|| anyhow!("timed out"))
    }
}

fn entry(title: &str, link: &str, summary: Option<&str>) -> FeedEntry {
    FeedEntry {
        title: title.into(),
        link: link.into(),
        summary: summary.map(Into::into),
        published: None,
    }
}

fn keywords() -> Vec<String> {
    ["gis", "ai", "remote sensing", "geospatial"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

const LONG_SUMMARY: &str =
    "A long enough feed summary about mapping pipelines that clearly passes the threshold.";

#[tokio::test]
async fn thin_summary_triggers_fallback_and_rich_one_does_not() {
    let src = "https://blog.mapbox.com/rss";
    let reader = MockReader {
        feeds: HashMap::from([(
            src.to_string(),
            Some(vec![
                entry("GIS tips", "https://x.test/a", Some("Too short.")),
                entry("GIS tricks", "https://x.test/b", Some(LONG_SUMMARY)),
                entry("GIS tools", "https://x.test/c", None),
            ]),
        )]),
    };
    let extractor = FallbackExtractor::new(CountingFetcher::serving(
        "<html><body><p>Fetched page text about geospatial AI.</p></body></html>",
    ));
    let (items, stats) = ingest(
        &[FeedSource::new(src)],
        &keywords(),
        &reader,
        &extractor,
        &RelevanceScorer::default(),
        &IngestOptions::default(),
        "2025-03-03",
    )
    .await;

    assert_eq!(items.len(), 3);
    assert_eq!(stats.fallbacks, 2);
    assert_eq!(items[0].summary, "Fetched page text about geospatial AI.");
    assert_eq!(items[1].summary, LONG_SUMMARY);
    assert_eq!(items[2].summary, "Fetched page text about geospatial AI.");
    assert!(items.iter().all(|i| i.published == "2025-03-03"));
}

#[tokio::test]
async fn failed_fallback_keeps_item_with_sentinel() {
    let src = "https://news.google.com/rss/search?q=gis";
    let reader = MockReader {
        feeds: HashMap::from([(
            src.to_string(),
            Some(vec![entry("GIS weekly", "https://x.test/z", None)]),
        )]),
    };
    let extractor = FallbackExtractor::new(CountingFetcher::failing());
    let (items, _) = ingest(
        &[FeedSource::new(src)],
        &keywords(),
        &reader,
        &extractor,
        &RelevanceScorer::default(),
        &IngestOptions::default(),
        "2025-03-03",
    )
    .await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].summary, CONTENT_NOT_AVAILABLE);
    // title "gis" (+3), "ai" inside "available" (+1)
    assert_eq!(items[0].score, 4);
}

#[tokio::test]
async fn failing_source_does_not_stop_the_run() {
    let reader = MockReader {
        feeds: HashMap::from([
            ("https://down.example/feed".to_string(), None),
            (
                "https://arxiv.org/rss/cs.CV".to_string(),
                Some(vec![entry(
                    "Remote sensing AI benchmark",
                    "https://arxiv.org/abs/1",
                    Some(LONG_SUMMARY),
                )]),
            ),
        ]),
    };
    let extractor = FallbackExtractor::new(CountingFetcher::failing());
    let sources = [
        FeedSource::new("https://down.example/feed"),
        FeedSource::new("https://arxiv.org/rss/cs.CV"),
    ];
    let (items, stats) = ingest(
        &sources,
        &keywords(),
        &reader,
        &extractor,
        &RelevanceScorer::default(),
        &IngestOptions::default(),
        "2025-03-03",
    )
    .await;

    assert_eq!(stats.source_errors, 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].source, "https://arxiv.org/rss/cs.CV");
}

#[tokio::test]
async fn only_first_entries_of_each_feed_are_considered() {
    let src = "https://blog.mapbox.com/rss";
    let many: Vec<FeedEntry> = (0..30)
        .map(|i| entry(&format!("GIS item {i}"), &format!("https://x.test/{i}"), Some(LONG_SUMMARY)))
        .collect();
    let reader = MockReader {
        feeds: HashMap::from([(src.to_string(), Some(many))]),
    };
    let fetcher = CountingFetcher::failing();
    let extractor = FallbackExtractor::new(fetcher);
    let (items, stats) = ingest(
        &[FeedSource::new(src)],
        &keywords(),
        &reader,
        &extractor,
        &RelevanceScorer::default(),
        &IngestOptions::default(),
        "2025-03-03",
    )
    .await;

    assert_eq!(items.len(), 20);
    assert_eq!(stats.entries, 20);
    assert_eq!(items.last().map(|i| i.title.as_str()), Some("GIS item 19"));
}

#[tokio::test]
async fn gated_entries_never_fetch_pages() {
    let src = "https://blog.mapbox.com/rss";
    let reader = MockReader {
        feeds: HashMap::from([(
            src.to_string(),
            Some(vec![
                entry("Quarterly earnings", "https://x.test/q", None),
                entry("Cooking with herbs", "https://x.test/h", None),
            ]),
        )]),
    };
    let extractor = FallbackExtractor::new(CountingFetcher::serving("<p>x</p>"));
    let (items, stats) = ingest(
        &[FeedSource::new(src)],
        &keywords(),
        &reader,
        &extractor,
        &RelevanceScorer::default(),
        &IngestOptions::default(),
        "2025-03-03",
    )
    .await;

    assert!(items.is_empty());
    assert_eq!(stats.gated, 2);
    assert_eq!(stats.fallbacks, 0);
}

#[tokio::test]
async fn entry_date_is_kept_when_present() {
    let src = "https://blog.mapbox.com/rss";
    let mut e = entry("GIS release", "https://x.test/d", Some(LONG_SUMMARY));
    e.published = Some("Sun, 02 Mar 2025 10:00:00 GMT".into());
    let reader = MockReader {
        feeds: HashMap::from([(src.to_string(), Some(vec![e]))]),
    };
    let extractor = FallbackExtractor::new(CountingFetcher::failing());
    let (items, _) = ingest(
        &[FeedSource::new(src)],
        &keywords(),
        &reader,
        &extractor,
        &RelevanceScorer::default(),
        &IngestOptions::default(),
        "2025-03-03",
    )
    .await;
    assert_eq!(items[0].published, "Sun, 02 Mar 2025 10:00:00 GMT");
}

#[tokio::test]
async fn nothing_relevant_end_to_end_renders_empty_digest() {
    let reader = MockReader {
        feeds: HashMap::from([
            ("https://a.example/feed".to_string(), Some(vec![])),
            (
                "https://b.example/feed".to_string(),
                Some(vec![entry("Stock market wrap", "https://b.example/1", None)]),
            ),
        ]),
    };
    let extractor = FallbackExtractor::new(CountingFetcher::failing());
    let sources = [
        FeedSource::new("https://a.example/feed"),
        FeedSource::new("https://b.example/feed"),
    ];
    let (items, _) = ingest(
        &sources,
        &keywords(),
        &reader,
        &extractor,
        &RelevanceScorer::default(),
        &IngestOptions::default(),
        "2025-03-03",
    )
    .await;

    assert!(items.is_empty());
    let selected = select_top(items, 8);
    assert!(selected.is_empty());
    assert_eq!(
        render_html(&selected, "Monday, March 03, 2025", "2025-03-03"),
        EMPTY_DIGEST_HTML
    );
}
