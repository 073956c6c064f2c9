// src/ingest/providers/rss.rs
//! Feed reader for RSS 2.0, RSS 1.0 (RDF) and Atom documents.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::ingest::extract::{BROWSER_USER_AGENT, DEFAULT_FETCH_TIMEOUT};
use crate::ingest::types::{FeedEntry, FeedReader, FeedSource};

/* ---- RSS 2.0 ---- */

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "dc:date", alias = "date")]
    dc_date: Option<String>,
    description: Option<String>,
}

/* ---- RSS 1.0 / RDF ---- */

#[derive(Debug, Deserialize)]
struct Rdf {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

/* ---- Atom ---- */

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedFormat {
    Rss,
    Rdf,
    Atom,
}

fn sniff_format(xml: &str) -> FeedFormat {
    if xml.contains("<rdf:RDF") {
        FeedFormat::Rdf
    } else if xml.contains("<feed") && !xml.contains("<rss") {
        FeedFormat::Atom
    } else {
        FeedFormat::Rss
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn from_rss_item(it: Item) -> FeedEntry {
    FeedEntry {
        title: it.title.unwrap_or_default().trim().to_string(),
        link: it.link.unwrap_or_default().trim().to_string(),
        summary: non_empty(it.description),
        published: non_empty(it.pub_date).or_else(|| non_empty(it.dc_date)),
    }
}

fn from_atom_entry(e: AtomEntry) -> FeedEntry {
    let link = e
        .link
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |r| r == "alternate"))
        .or_else(|| e.link.first())
        .map(|l| l.href.trim().to_string())
        .unwrap_or_default();

    FeedEntry {
        title: e.title.map(|t| t.value.trim().to_string()).unwrap_or_default(),
        link,
        summary: non_empty(e.summary.map(|t| t.value))
            .or_else(|| non_empty(e.content.map(|t| t.value))),
        published: non_empty(e.published).or_else(|| non_empty(e.updated)),
    }
}

/// Parse a feed document into raw entries, in document order.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);

    let out: Vec<FeedEntry> = match sniff_format(&xml_clean) {
        FeedFormat::Rss => {
            let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;
            rss.channel.item.into_iter().map(from_rss_item).collect()
        }
        FeedFormat::Rdf => {
            let rdf: Rdf = from_str(&xml_clean).context("parsing rdf xml")?;
            rdf.item.into_iter().map(from_rss_item).collect()
        }
        FeedFormat::Atom => {
            let feed: AtomFeed = from_str(&xml_clean).context("parsing atom xml")?;
            feed.entry.into_iter().map(from_atom_entry).collect()
        }
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("digest_feed_parse_ms").record(ms);
    counter!("digest_entries_total").increment(out.len() as u64);
    Ok(out)
}

pub struct RssFeedReader {
    mode: Mode,
}

enum Mode {
    // Stored documents keyed by feed URL (tests, offline runs).
    Fixture(HashMap<String, String>),
    Http { client: Client, timeout: Duration },
}

impl RssFeedReader {
    pub fn http() -> Self {
        Self::http_with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn http_with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            mode: Mode::Http { client, timeout },
        }
    }

    /// Serve `xml` for `url`; unknown URLs read as errors.
    pub fn from_fixtures<I, K, V>(fixtures: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = fixtures
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            mode: Mode::Fixture(map),
        }
    }
}

#[async_trait]
impl FeedReader for RssFeedReader {
    async fn read_feed(&self, source: &FeedSource) -> Result<Vec<FeedEntry>> {
        match &self.mode {
            Mode::Fixture(docs) => {
                let xml = docs
                    .get(&source.url)
                    .with_context(|| format!("no fixture for {}", source.url))?;
                parse_feed(xml)
            }
            Mode::Http { client, timeout } => {
                let body = client
                    .get(&source.url)
                    .timeout(*timeout)
                    .send()
                    .await
                    .with_context(|| format!("feed http get() {}", source.url))?
                    .error_for_status()
                    .context("feed http status")?
                    .text()
                    .await
                    .context("feed http .text()")?;
                parse_feed(&body)
            }
        }
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
