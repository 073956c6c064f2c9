// src/ingest/mod.rs
pub mod extract;
pub mod providers;
pub mod types;

use crate::config::DigestConfig;
use crate::ingest::extract::{truncate_with_ellipsis, FallbackExtractor, EXCERPT_CHARS};
use crate::ingest::types::{CandidateItem, FeedReader, FeedSource, PageFetcher};
use crate::relevance::RelevanceScorer;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

pub const DEFAULT_ENTRIES_PER_SOURCE: usize = 20;
pub const DEFAULT_MIN_SUMMARY_CHARS: usize = 50;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("digest_entries_total", "Total entries parsed from feeds.");
        describe_counter!(
            "digest_candidates_total",
            "Entries kept as scored candidates."
        );
        describe_counter!(
            "digest_gate_filtered_total",
            "Entries dropped by the title keyword gate."
        );
        describe_counter!(
            "digest_dedup_total",
            "Entries dropped because their link was already seen."
        );
        describe_counter!(
            "digest_fallback_total",
            "Fallback page extractions for thin summaries."
        );
        describe_counter!(
            "digest_source_errors_total",
            "Feed fetch/parse errors."
        );
        describe_histogram!("digest_feed_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "digest_last_run_ts",
            "Unix ts when the ingest pipeline last ran."
        );
        describe_counter!("digest_runs_total", "Completed digest runs.");
        describe_gauge!(
            "digest_last_scheduled_run_ts",
            "Unix ts of the last scheduled digest tick."
        );
    });
}

/// Normalize feed text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// Coarse relevance gate: any keyword in the lower-cased title.
pub fn passes_keyword_gate<S: AsRef<str>>(title: &str, keywords: &[S]) -> bool {
    let t = title.to_lowercase();
    keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .any(|k| t.contains(&k.to_lowercase()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Only the first N entries of each feed are looked at.
    pub entries_per_source: usize,
    /// Feed summaries shorter than this trigger fallback extraction.
    pub min_summary_chars: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            entries_per_source: DEFAULT_ENTRIES_PER_SOURCE,
            min_summary_chars: DEFAULT_MIN_SUMMARY_CHARS,
        }
    }
}

/// Per-run counters, also mirrored into `metrics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub entries: usize,
    pub kept: usize,
    pub gated: usize,
    pub duplicates: usize,
    pub fallbacks: usize,
    pub source_errors: usize,
}

/// Walk `sources` in order and build deduplicated, scored candidates.
///
/// `fallback_published` is used for entries that carry no date.
/// Output order follows discovery order; callers sort via `select_top`.
pub async fn ingest<R, P>(
    sources: &[FeedSource],
    keywords: &[String],
    reader: &R,
    extractor: &FallbackExtractor<P>,
    scorer: &RelevanceScorer,
    opts: &IngestOptions,
    fallback_published: &str,
) -> (Vec<CandidateItem>, IngestStats)
where
    R: FeedReader + ?Sized,
    P: PageFetcher,
{
    let mut stats = IngestStats::default();
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for source in sources {
        tracing::info!(target: "ingest", feed = %source.url, "checking feed");
        let entries = match reader.read_feed(source).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, feed = %source.url, "feed error");
                stats.source_errors += 1;
                continue;
            }
        };
        if entries.is_empty() {
            tracing::info!(target: "ingest", feed = %source.url, "no entries found in this feed");
            continue;
        }

        for entry in entries.into_iter().take(opts.entries_per_source) {
            stats.entries += 1;

            if entry.title.is_empty() || entry.link.is_empty() {
                tracing::debug!(target: "ingest", feed = %source.url, "entry without title/link skipped");
                continue;
            }
            if seen_links.contains(&entry.link) {
                stats.duplicates += 1;
                continue;
            }
            if !passes_keyword_gate(&entry.title, keywords) {
                stats.gated += 1;
                continue;
            }

            let summary = entry
                .summary
                .as_deref()
                .map(normalize_text)
                .unwrap_or_default();
            let content = if summary.chars().count() < opts.min_summary_chars {
                stats.fallbacks += 1;
                extractor.extract_excerpt(&entry.link).await
            } else {
                summary
            };

            let rel = scorer.evaluate(&entry.title, &content, source);
            tracing::debug!(
                target: "relevance",
                link = %entry.link,
                score = rel.score,
                reasons = ?rel.reasons,
            );

            let item = CandidateItem {
                title: entry.title,
                link: entry.link,
                summary: truncate_with_ellipsis(&content, EXCERPT_CHARS),
                source: source.url.clone(),
                category: source.category,
                published: entry
                    .published
                    .unwrap_or_else(|| fallback_published.to_string()),
                score: rel.score,
            };
            tracing::info!(target: "ingest", title = %item.title, score = item.score, "added");
            seen_links.insert(item.link.clone());
            out.push(item);
        }
    }

    stats.kept = out.len();
    (out, stats)
}

/// Run ingest once with the configured feeds, keywords and scoring terms.
pub async fn run_once<R, P>(
    cfg: &DigestConfig,
    reader: &R,
    extractor: &FallbackExtractor<P>,
) -> Vec<CandidateItem>
where
    R: FeedReader + ?Sized,
    P: PageFetcher,
{
    ensure_metrics_described();

    let scorer = RelevanceScorer::new(&cfg.scoring);
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let (items, stats) = ingest(
        &cfg.feed_sources(),
        &cfg.keywords,
        reader,
        extractor,
        &scorer,
        &cfg.ingest_options(),
        &today,
    )
    .await;

    // Telemetry
    counter!("digest_candidates_total").increment(stats.kept as u64);
    counter!("digest_gate_filtered_total").increment(stats.gated as u64);
    counter!("digest_dedup_total").increment(stats.duplicates as u64);
    counter!("digest_fallback_total").increment(stats.fallbacks as u64);
    counter!("digest_source_errors_total").increment(stats.source_errors as u64);
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    gauge!("digest_last_run_ts").set(now as f64);

    tracing::info!(
        target: "ingest",
        kept = stats.kept,
        gated = stats.gated,
        dedup = stats.duplicates,
        fallbacks = stats.fallbacks,
        source_errors = stats.source_errors,
        "ingest run finished"
    );

    items
}
