// tests/ingest_normalize.rs
use geo_ai_digest::ingest::{normalize_text, passes_keyword_gate};

#[test]
fn empty_is_ok() {
    assert_eq!(normalize_text(""), "");
}

#[test]
fn strips_html_and_unescapes() {
    let s = "<p>Hello&nbsp;<b>world</b> &ldquo;ok&rdquo;</p>";
    assert_eq!(normalize_text(s), r#"Hello world "ok""#);
}

#[test]
fn folds_whitespace_and_nbsp() {
    let s = "A\u{00A0}\n\tB   C";
    assert_eq!(normalize_text(s), "A B C");
}

#[test]
fn markup_only_summary_counts_as_thin() {
    // Looks long in the raw feed, almost nothing once tags are gone.
    let raw = r#"<div class="feedflare"><a href="https://feeds.example.org/~ff/x?a=1"><img src="https://feeds.example.org/~ff/x?i=1" border="0"></img></a></div>"#;
    assert!(raw.chars().count() >= 50);
    assert!(normalize_text(raw).chars().count() < 50);
}

#[test]
fn gate_matches_substrings_anywhere_in_title() {
    let kw = vec!["ai".to_string(), "remote sensing".to_string()];
    // "ai" hides inside "Detail"; substring matching keeps it.
    assert!(passes_keyword_gate("Detail of the new release", &kw));
    assert!(passes_keyword_gate("REMOTE SENSING weekly", &kw));
    assert!(!passes_keyword_gate("Weekly roundup", &kw));
}
