// src/digest.rs
//! HTML body of the daily digest email.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use crate::ingest::types::CandidateItem;

/// Body sent when nothing relevant was found.
pub const EMPTY_DIGEST_HTML: &str =
    "<p>No relevant articles found today. Check back tomorrow!</p>";

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 25px; text-align: center; }
        .article { margin-bottom: 30px; padding: 20px; border-radius: 8px; background-color: #f8f9fa; border-left: 5px solid #667eea; }
        .article h3 { margin-top: 0; color: #2c3e50; }
        .article a { color: #3498db; text-decoration: none; font-weight: bold; }
        .meta { font-size: 0.9em; color: #7f8c8d; margin-bottom: 12px; }
        .score { float: right; background-color: #667eea; color: white; padding: 4px 12px; border-radius: 15px; font-size: 0.85em; }
        .footer { margin-top: 40px; padding: 20px; text-align: center; font-size: 0.9em; color: #7f8c8d; border-top: 1px solid #eee; }
        .source-badge { display: inline-block; padding: 4px 10px; border-radius: 4px; font-size: 0.8em; margin-right: 10px; }
        .source-arxiv { background-color: #8e44ad; color: white; }
        .source-google { background-color: #e74c3c; color: white; }
        .source-esri { background-color: #2ecc71; color: white; }
        .source-nasa { background-color: #0b3d91; color: white; }
        .source-medium { background-color: #3498db; color: white; }
        .insight { background-color: #fff3cd; border-left: 5px solid #ffc107; padding: 15px; margin: 20px 0; border-radius: 5px; }
"#;

/// Email subject for the given `YYYY-MM-DD` date.
pub fn subject_line(date: &str) -> String {
    format!("AI & GIS Daily Digest - {date}")
}

/// Render `items` (already selected and ordered).
///
/// `long_date` goes into the header (e.g. "Monday, March 03, 2025"),
/// `short_date` into the footer.
pub fn render_html(items: &[CandidateItem], long_date: &str, short_date: &str) -> String {
    if items.is_empty() {
        return EMPTY_DIGEST_HTML.to_string();
    }

    let mut html = String::with_capacity(4096 + items.len() * 1024);
    let _ = write!(
        html,
        r#"<html>
<head>
    <meta charset="utf-8">
    <style>{STYLE}    </style>
</head>
<body>
    <div class="header">
        <h1>AI &amp; GIS Daily Digest</h1>
        <p>{date}</p>
        <p>Top {count} most relevant articles curated for you</p>
    </div>

    <div class="insight">
        <strong>Today's Focus:</strong> The most significant developments in geospatial AI,
        machine learning applications, and data science innovations.
        A concise mix of research, product releases, and practical use-cases you can skim in minutes.
    </div>
"#,
        date = encode_text(long_date),
        count = items.len(),
    );

    for (i, item) in items.iter().enumerate() {
        let _ = write!(
            html,
            r#"
    <div class="article">
        <span class="score">Relevance: {score}</span>
        <h3>{idx}. {title}</h3>
        <div class="meta">
            <span class="source-badge {badge_class}">{badge}</span>
            <strong>Published:</strong> {published}
        </div>
        <p>{summary}</p>
        <p><a href="{link}">Read full article</a></p>
    </div>
"#,
            score = item.score,
            idx = i + 1,
            title = encode_text(&item.title),
            badge_class = item.category.css_class(),
            badge = item.category.label(),
            published = encode_text(&item.published),
            summary = encode_text(&item.summary),
            link = encode_double_quoted_attribute(&item.link),
        );
    }

    let _ = write!(
        html,
        r#"
    <div class="footer">
        <p>Curated from leading sources &bull; {date}</p>
    </div>
</body>
</html>
"#,
        date = encode_text(short_date),
    );

    tracing::debug!(target: "digest", items = items.len(), bytes = html.len(), "digest rendered");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_weights::SourceCategory;

    fn item(title: &str, score: u32, category: SourceCategory) -> CandidateItem {
        CandidateItem {
            title: title.to_string(),
            link: format!("https://example.org/{score}"),
            summary: "Summary".into(),
            source: "https://example.org/feed".into(),
            category,
            published: "2025-03-03".into(),
            score,
        }
    }

    #[test]
    fn empty_digest_has_fallback_message() {
        assert_eq!(render_html(&[], "Monday", "2025-03-03"), EMPTY_DIGEST_HTML);
    }

    #[test]
    fn items_are_numbered_in_order() {
        let items = vec![
            item("First", 20, SourceCategory::Arxiv),
            item("Second", 10, SourceCategory::Other),
        ];
        let html = render_html(&items, "Monday, March 03, 2025", "2025-03-03");
        let a = html.find("1. First").expect("first");
        let b = html.find("2. Second").expect("second");
        assert!(a < b);
        assert!(html.contains("Relevance: 20"));
        assert!(html.contains("source-arxiv"));
        assert!(html.contains("Top 2 most relevant"));
    }

    #[test]
    fn subject_has_date() {
        assert_eq!(subject_line("2025-03-03"), "AI & GIS Daily Digest - 2025-03-03");
    }
}
