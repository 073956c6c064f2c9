// src/ingest/extract.rs
//! Fallback excerpt extraction for entries whose feed summary is too thin.

use anyhow::{Context, Result};
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::OnceCell;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Node};
use std::time::Duration;

use crate::ingest::types::PageFetcher;

/// Returned whenever a page cannot be fetched or reduced to text.
pub const CONTENT_NOT_AVAILABLE: &str = "Content not available";
/// Display length of summaries/excerpts, in characters.
pub const EXCERPT_CHARS: usize = 250;
pub const ELLIPSIS: &str = "...";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Some servers refuse requests without a browser-looking agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// How much of the body is searched for a `<meta charset>` declaration.
const CHARSET_SNIFF_BYTES: usize = 1024;

const SKIPPED_ELEMENTS: [&str; 6] = ["script", "style", "nav", "footer", "header", "aside"];

/// Cut `text` to `max` characters and append `...` if anything was dropped.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut out: String = text.chars().take(max).collect();
        out.push_str(ELLIPSIS);
        out
    } else {
        text.to_string()
    }
}

/// Collapse whitespace the way the digest expects: per line trim, split on
/// double spaces, drop empty fragments, join with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce an HTML document to visible text, skipping non-content markup.
pub fn html_to_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);

    for node in doc.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            raw.push_str(text);
        }
    }

    collapse_whitespace(&raw)
}

/// Decode a page body: BOM first, then a `<meta>` charset near the top,
/// otherwise UTF-8. Undecodable bytes become U+FFFD.
pub fn decode_page(bytes: &[u8]) -> String {
    static RE_CHARSET: OnceCell<Regex> = OnceCell::new();
    let re = RE_CHARSET.get_or_init(|| {
        Regex::new(r#"(?i)<meta[^>]*charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).unwrap()
    });

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(CHARSET_SNIFF_BYTES)]);
    let declared = re
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        // a meta tag can't really mean UTF-16 for an ASCII-readable head
        .map(Encoding::output_encoding)
        .unwrap_or(UTF_8);

    // `decode` still lets a BOM override the declared label.
    let (text, _, _) = declared.decode(bytes);
    text.into_owned()
}

/// Plain `reqwest` fetcher with a browser user agent.
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        // Error pages still carry readable text; only transport failures count.
        if !resp.status().is_success() {
            tracing::debug!(target: "extract", %url, status = %resp.status(), "non-success page status");
        }
        let body = resp.bytes().await.context("reading page body")?;
        Ok(body.to_vec())
    }
}

/// Fetches a page and turns it into a short excerpt. Never fails.
pub struct FallbackExtractor<P: PageFetcher> {
    fetcher: P,
    timeout: Duration,
}

impl FallbackExtractor<HttpPageFetcher> {
    pub fn http() -> Self {
        Self::new(HttpPageFetcher::new())
    }
}

impl<P: PageFetcher> FallbackExtractor<P> {
    pub fn new(fetcher: P) -> Self {
        Self {
            fetcher,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn try_extract(&self, url: &str) -> Result<String> {
        let bytes = self.fetcher.fetch_page(url, self.timeout).await?;
        Ok(html_to_text(&decode_page(&bytes)))
    }

    /// Excerpt of the page at `url`, or [`CONTENT_NOT_AVAILABLE`].
    pub async fn extract_excerpt(&self, url: &str) -> String {
        match self.try_extract(url).await {
            Ok(text) => truncate_with_ellipsis(&text, EXCERPT_CHARS),
            Err(e) => {
                tracing::warn!(target: "extract", error = ?e, %url, "error extracting content");
                CONTENT_NOT_AVAILABLE.to_string()
            }
        }
    }
}
