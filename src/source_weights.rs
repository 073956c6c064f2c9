//! # Source Weights
//!
//! Closed set of feed categories and the flat scoring bonus each one earns.
//!
//! - A feed URL is classified once, when the configuration is built.
//! - Classification is a case-insensitive substring match on the URL.
//! - Precedence: arXiv → Esri → NASA → Google News → blogs → other.
//! - Only arXiv, Esri and NASA carry a bonus; the rest only drive the
//!   badge shown in the rendered digest.

use serde::{Deserialize, Serialize};

/// Bonus for academic preprints.
pub const ARXIV_BONUS: u32 = 5;
/// Bonus for the Esri blog (GIS vendor).
pub const ESRI_BONUS: u32 = 4;
/// Bonus for NASA feeds.
pub const NASA_BONUS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    Arxiv,
    Esri,
    Nasa,
    GoogleNews,
    Blog,
    Other,
}

impl SourceCategory {
    /// Resolve the category of a feed identifier (usually its URL).
    pub fn classify(source: &str) -> Self {
        let s = source.trim().to_ascii_lowercase();

        if s.contains("arxiv") {
            SourceCategory::Arxiv
        } else if s.contains("esri") {
            SourceCategory::Esri
        } else if s.contains("nasa") {
            SourceCategory::Nasa
        } else if s.contains("google") {
            SourceCategory::GoogleNews
        } else if s.contains("medium") || s.contains("towardsdatascience") {
            SourceCategory::Blog
        } else {
            SourceCategory::Other
        }
    }

    /// Flat additive scoring bonus.
    pub fn bonus(self) -> u32 {
        match self {
            SourceCategory::Arxiv => ARXIV_BONUS,
            SourceCategory::Esri => ESRI_BONUS,
            SourceCategory::Nasa => NASA_BONUS,
            SourceCategory::GoogleNews | SourceCategory::Blog | SourceCategory::Other => 0,
        }
    }

    /// Human label for the digest badge.
    pub fn label(self) -> &'static str {
        match self {
            SourceCategory::Arxiv => "arXiv",
            SourceCategory::Esri => "Esri",
            SourceCategory::Nasa => "NASA",
            SourceCategory::GoogleNews => "Google News",
            SourceCategory::Blog => "Blog",
            SourceCategory::Other => "Other",
        }
    }

    /// CSS class for the digest badge (empty for uncategorised sources).
    pub fn css_class(self) -> &'static str {
        match self {
            SourceCategory::Arxiv => "source-arxiv",
            SourceCategory::Esri => "source-esri",
            SourceCategory::Nasa => "source-nasa",
            SourceCategory::GoogleNews => "source-google",
            SourceCategory::Blog => "source-medium",
            SourceCategory::Other => "",
        }
    }
}
