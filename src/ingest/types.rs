// src/ingest/types.rs
use anyhow::Result;
use std::time::Duration;

use crate::source_weights::SourceCategory;

/// One configured feed, with its category resolved once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub url: String,
    pub category: SourceCategory,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let category = SourceCategory::classify(&url);
        Self { url, category }
    }

    pub fn with_category(url: impl Into<String>, category: SourceCategory) -> Self {
        Self {
            url: url.into(),
            category,
        }
    }
}

/// Raw entry as handed over by a feed, before gating/dedup/scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: Option<String>,
    pub published: Option<String>,
}

/// Scored, deduplicated entry eligible for selection.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CandidateItem {
    pub title: String,
    pub link: String, // dedup key
    pub summary: String,
    pub source: String, // feed URL
    pub category: SourceCategory,
    pub published: String,
    pub score: u32,
}

#[async_trait::async_trait]
pub trait FeedReader: Send + Sync {
    /// Returns the entries of one feed. An empty feed is `Ok(vec![])`.
    async fn read_feed(&self, source: &FeedSource) -> Result<Vec<FeedEntry>>;
}

#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Raw page body for `url`, bounded by `timeout`.
    async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<Vec<u8>>;
}
