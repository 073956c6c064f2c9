// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod digest;
pub mod ingest;
pub mod notify;
pub mod relevance;
pub mod scheduler;
pub mod select;
pub mod source_weights;

// ---- Re-exports for stable public API ----
pub use crate::config::DigestConfig;
pub use crate::ingest::extract::{FallbackExtractor, HttpPageFetcher, CONTENT_NOT_AVAILABLE};
pub use crate::ingest::providers::rss::RssFeedReader;
pub use crate::ingest::types::{CandidateItem, FeedEntry, FeedSource};
pub use crate::relevance::RelevanceScorer;
pub use crate::select::select_top;
pub use crate::source_weights::SourceCategory;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber for the binaries.
///
/// Filter comes from `RUST_LOG` (default: pipeline targets at info, rest at warn);
/// `DIGEST_LOG_JSON=1` switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ingest=info,digest=info,relevance=info,geo_ai_digest=info,warn"));

    let json = std::env::var("DIGEST_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    // Already initialised (e.g. tests) is fine.
    let _ = res;
}
