// src/config/mod.rs
//! Digest configuration: feeds, title keywords, scoring vocabulary, limits
//! and email delivery. Passed explicitly into every entry point.

pub mod email;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::types::FeedSource;
use crate::ingest::{IngestOptions, DEFAULT_ENTRIES_PER_SOURCE, DEFAULT_MIN_SUMMARY_CHARS};
use crate::relevance::ScoringTerms;
use crate::select::DEFAULT_MAX_ARTICLES;
use crate::source_weights::SourceCategory;

pub use email::EmailConfig;

pub const ENV_DIGEST_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_DIGEST_CONFIG_PATH: &str = "config/digest.toml";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeedConfig {
    pub url: String,
    /// Overrides URL-based classification.
    #[serde(default)]
    pub category: Option<SourceCategory>,
}

impl FeedConfig {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            category: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DigestConfig {
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
    #[serde(default = "default_entries_per_source")]
    pub entries_per_source: usize,
    #[serde(default = "default_min_summary_chars")]
    pub min_summary_chars: usize,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Title gate. Independent of the scoring vocabulary.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,
    #[serde(default)]
    pub scoring: ScoringTerms,
    #[serde(default)]
    pub email: EmailConfig,
}

fn default_max_articles() -> usize {
    DEFAULT_MAX_ARTICLES
}
fn default_entries_per_source() -> usize {
    DEFAULT_ENTRIES_PER_SOURCE
}
fn default_min_summary_chars() -> usize {
    DEFAULT_MIN_SUMMARY_CHARS
}
fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_keywords() -> Vec<String> {
    [
        "gis",
        "geospatial",
        "spatial",
        "ai",
        "artificial intelligence",
        "machine learning",
        "deep learning",
        "remote sensing",
        "satellite",
        "imagery",
        "computer vision",
        "neural network",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_feeds() -> Vec<FeedConfig> {
    [
        // Google News searches
        "https://news.google.com/rss/search?q=%22AI+GIS%22+OR+%22GIS+AI%22+OR+%22machine+learning+GIS%22&ceid=US:en&hl=en-US&gl=US",
        "https://news.google.com/rss/search?q=geospatial+artificial+intelligence+OR+spatial+AI&ceid=US:en&hl=en-US&gl=US",
        // Academic
        "https://arxiv.org/rss/cs.AI",
        "https://arxiv.org/rss/cs.CV",
        // GIS blogs
        "https://www.esri.com/arcgis-blog/feed/",
        "https://blog.mapbox.com/rss",
        // Tech blogs
        "https://towardsdatascience.com/feed/tagged/geospatial",
    ]
    .iter()
    .map(|u| FeedConfig::new(u))
    .collect()
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            max_articles: default_max_articles(),
            entries_per_source: default_entries_per_source(),
            min_summary_chars: default_min_summary_chars(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            keywords: default_keywords(),
            feeds: default_feeds(),
            scoring: ScoringTerms::default(),
            email: EmailConfig::default(),
        }
    }
}

impl DigestConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading digest config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::parse(&content, ext.as_str())
    }

    /// Load using env var + fallbacks, then apply email env overrides:
    /// 1) $DIGEST_CONFIG_PATH
    /// 2) config/digest.toml
    /// 3) config/digest.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let mut cfg = Self::load_file_default()?;
        cfg.email.apply_env();
        Ok(cfg)
    }

    fn load_file_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_DIGEST_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("DIGEST_CONFIG_PATH points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from(DEFAULT_DIGEST_CONFIG_PATH);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/digest.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    fn parse(s: &str, hint_ext: &str) -> Result<Self> {
        let cfg: Self = if hint_ext == "json" {
            serde_json::from_str(s).context("parsing digest config json")?
        } else {
            toml::from_str(s).context("parsing digest config toml")?
        };
        Ok(cfg.sanitized())
    }

    /// Zero limits make no sense for a digest; fall back to defaults.
    fn sanitized(mut self) -> Self {
        if self.max_articles == 0 {
            self.max_articles = default_max_articles();
        }
        if self.entries_per_source == 0 {
            self.entries_per_source = default_entries_per_source();
        }
        if self.fetch_timeout_secs == 0 {
            self.fetch_timeout_secs = default_fetch_timeout_secs();
        }
        self.keywords = clean_list(std::mem::take(&mut self.keywords));
        self.feeds.retain(|f| !f.url.trim().is_empty());
        self
    }

    /// Feeds with their categories resolved.
    pub fn feed_sources(&self) -> Vec<FeedSource> {
        self.feeds
            .iter()
            .map(|f| match f.category {
                Some(c) => FeedSource::with_category(f.url.trim(), c),
                None => FeedSource::new(f.url.trim()),
            })
            .collect()
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            entries_per_source: self.entries_per_source,
            min_summary_chars: self.min_summary_chars,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Trim, lower-case, drop empties and repeats; keeps first-seen order.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
