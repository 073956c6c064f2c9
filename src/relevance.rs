// src/relevance.rs
//! Relevance scorer: weighted term sets over title + content, plus a flat
//! source bonus. Pure and deterministic; no recency input.

use serde::Deserialize;

use crate::ingest::types::FeedSource;

// --- points per match ---
pub const HIGH_TITLE_POINTS: u32 = 10;
pub const HIGH_CONTENT_POINTS: u32 = 5;
pub const MEDIUM_TITLE_POINTS: u32 = 5;
pub const MEDIUM_CONTENT_POINTS: u32 = 2;
pub const TERM_TITLE_POINTS: u32 = 3;
pub const TERM_CONTENT_POINTS: u32 = 1;

/* ----------------------------
Config schema (from TOML)
---------------------------- */

/// Scoring vocabulary. Every list is matched as a lower-case substring.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ScoringTerms {
    /// Phrases combining both domains ("ai gis", "remote sensing ai", ...).
    #[serde(default = "default_high_relevance")]
    pub high_relevance: Vec<String>,
    /// Domain-adjacent application phrases ("spatial ai", ...).
    #[serde(default = "default_medium_relevance")]
    pub medium_relevance: Vec<String>,
    #[serde(default = "default_gis_terms")]
    pub gis_terms: Vec<String>,
    #[serde(default = "default_ai_terms")]
    pub ai_terms: Vec<String>,
}

impl Default for ScoringTerms {
    fn default() -> Self {
        Self {
            high_relevance: default_high_relevance(),
            medium_relevance: default_medium_relevance(),
            gis_terms: default_gis_terms(),
            ai_terms: default_ai_terms(),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_high_relevance() -> Vec<String> {
    owned(&[
        "ai gis",
        "gis ai",
        "ai and gis",
        "gis and ai",
        "machine learning gis",
        "gis machine learning",
        "deep learning geospatial",
        "geospatial deep learning",
        "computer vision gis",
        "gis computer vision",
        "ai remote sensing",
        "remote sensing ai",
        "artificial intelligence gis",
        "gis artificial intelligence",
    ])
}

fn default_medium_relevance() -> Vec<String> {
    owned(&[
        "spatial ai",
        "ai spatial",
        "geospatial ai",
        "ai geospatial",
        "satellite imagery ai",
        "ai satellite imagery",
        "drone mapping ai",
        "ai drone mapping",
        "urban planning ai",
        "ai urban planning",
        "environmental monitoring ai",
        "ai environmental monitoring",
    ])
}

fn default_gis_terms() -> Vec<String> {
    owned(&["gis", "geospatial", "spatial", "mapping", "cartography"])
}

fn default_ai_terms() -> Vec<String> {
    owned(&[
        "ai",
        "artificial intelligence",
        "machine learning",
        "deep learning",
        "computer vision",
    ])
}

/// Score plus the terms that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relevance {
    pub score: u32,
    pub reasons: Vec<String>,
}

/* ----------------------------
Compiled scorer
---------------------------- */

#[derive(Debug, Clone)]
struct WeightedSet {
    name: &'static str,
    terms: Vec<String>,
    title_points: u32,
    content_points: u32,
}

impl WeightedSet {
    fn new(name: &'static str, terms: &[String], title_points: u32, content_points: u32) -> Self {
        let mut lowered: Vec<String> = terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        // keep list order, drop repeats so a term is never counted twice
        let mut seen = std::collections::HashSet::new();
        lowered.retain(|t| seen.insert(t.clone()));
        Self {
            name,
            terms: lowered,
            title_points,
            content_points,
        }
    }

    fn apply(&self, title: &str, content: &str, rel: &mut Relevance) {
        for term in &self.terms {
            if title.contains(term.as_str()) {
                rel.score += self.title_points;
                rel.reasons.push(format!("{}:title:{}", self.name, term));
            }
            if content.contains(term.as_str()) {
                rel.score += self.content_points;
                rel.reasons.push(format!("{}:content:{}", self.name, term));
            }
        }
    }
}

/// Holds lower-cased term sets; build once per run and share by reference.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    sets: Vec<WeightedSet>,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(&ScoringTerms::default())
    }
}

impl RelevanceScorer {
    pub fn new(terms: &ScoringTerms) -> Self {
        let sets = vec![
            WeightedSet::new(
                "high",
                &terms.high_relevance,
                HIGH_TITLE_POINTS,
                HIGH_CONTENT_POINTS,
            ),
            WeightedSet::new(
                "medium",
                &terms.medium_relevance,
                MEDIUM_TITLE_POINTS,
                MEDIUM_CONTENT_POINTS,
            ),
            WeightedSet::new("gis", &terms.gis_terms, TERM_TITLE_POINTS, TERM_CONTENT_POINTS),
            WeightedSet::new("ai", &terms.ai_terms, TERM_TITLE_POINTS, TERM_CONTENT_POINTS),
        ];
        Self { sets }
    }

    /// Full evaluation with reasons (used for debug logging).
    pub fn evaluate(&self, title: &str, content: &str, source: &FeedSource) -> Relevance {
        let title = title.to_lowercase();
        let content = content.to_lowercase();

        let mut rel = Relevance::default();
        for set in &self.sets {
            set.apply(&title, &content, &mut rel);
        }

        let bonus = source.category.bonus();
        if bonus > 0 {
            rel.score += bonus;
            rel.reasons
                .push(format!("source:{}:+{}", source.category.label(), bonus));
        }
        rel
    }

    /// Relevance score of one entry.
    pub fn score(&self, title: &str, content: &str, source: &FeedSource) -> u32 {
        self.evaluate(title, content, source).score
    }
}
