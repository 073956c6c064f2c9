// src/select.rs
//! Top-N selection over scored candidates.

use crate::ingest::types::CandidateItem;

/// Default number of items in a digest.
pub const DEFAULT_MAX_ARTICLES: usize = 8;

/// Highest scores first, at most `max_count` items.
///
/// The sort is stable: equal scores keep their ingestion (discovery) order.
pub fn select_top(mut items: Vec<CandidateItem>, max_count: usize) -> Vec<CandidateItem> {
    items.sort_by(|a, b| b.score.cmp(&a.score));
    items.truncate(max_count);
    items
}
