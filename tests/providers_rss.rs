// tests/providers_rss.rs
use geo_ai_digest::ingest::providers::rss::{parse_feed, RssFeedReader};
use geo_ai_digest::ingest::types::{FeedReader, FeedSource};

const ARXIV_XML: &str = include_str!("fixtures/arxiv_rss.xml");
const ATOM_XML: &str = include_str!("fixtures/atom_feed.xml");
const RDF_XML: &str = include_str!("fixtures/rdf_feed.xml");

#[test]
fn rss_fixture_keeps_document_order_and_fields() {
    let entries = parse_feed(ARXIV_XML).expect("rss parse ok");
    assert_eq!(entries.len(), 3);

    assert_eq!(
        entries[0].title,
        "Self-supervised remote sensing segmentation with satellite imagery"
    );
    assert_eq!(entries[0].link, "https://arxiv.org/abs/2503.00001");
    assert_eq!(
        entries[0].published.as_deref(),
        Some("Mon, 03 Mar 2025 00:00:00 -0500")
    );
    assert!(entries[0]
        .summary
        .as_deref()
        .is_some_and(|s| s.contains("land cover mapping")));

    // HTML entities inside XML text are tolerated.
    assert_eq!(entries[1].title, "Geospatial foundation models - a survey");
    assert_eq!(entries[1].published.as_deref(), Some("2025-03-03T00:00:00Z"));

    assert_eq!(entries[2].published, None);
}

#[test]
fn atom_fixture_prefers_alternate_link() {
    let entries = parse_feed(ATOM_XML).expect("atom parse ok");
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].title, "GeoAI tools in ArcGIS Pro");
    assert_eq!(
        entries[0].link,
        "https://www.esri.com/arcgis-blog/products/geoai-tools"
    );
    assert_eq!(entries[0].published.as_deref(), Some("2025-03-02T18:30:02Z"));
    assert!(entries[0]
        .summary
        .as_deref()
        .is_some_and(|s| s.contains("Pretrained deep learning models")));

    // No summary → content; no rel → taken as the article link.
    assert_eq!(
        entries[1].link,
        "https://www.esri.com/arcgis-blog/products/spatial-joins"
    );
    assert_eq!(
        entries[1].summary.as_deref(),
        Some("A walkthrough of joining layers by location.")
    );
    assert_eq!(entries[1].published.as_deref(), Some("2025-03-01T08:00:00Z"));
}

#[test]
fn rdf_fixture_reads_items_outside_channel() {
    let entries = parse_feed(RDF_XML).expect("rdf parse ok");
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0].title,
        "Neural network planners for spatial reasoning"
    );
    assert_eq!(entries[0].link, "http://arxiv.org/abs/2503.00100");
    assert_eq!(entries[0].published.as_deref(), Some("2025-03-03"));
    assert_eq!(entries[1].summary.as_deref(), Some("An agent benchmark."));
}

#[test]
fn malformed_xml_is_an_error() {
    assert!(parse_feed("<rss><channel><item><title>x</title></channel>").is_err());
}

#[tokio::test]
async fn fixture_reader_serves_by_url() {
    let reader = RssFeedReader::from_fixtures([
        ("https://arxiv.org/rss/cs.CV", ARXIV_XML),
        ("https://www.esri.com/arcgis-blog/feed/", ATOM_XML),
    ]);

    let arxiv = reader
        .read_feed(&FeedSource::new("https://arxiv.org/rss/cs.CV"))
        .await
        .expect("arxiv fixture");
    assert_eq!(arxiv.len(), 3);

    let esri = reader
        .read_feed(&FeedSource::new("https://www.esri.com/arcgis-blog/feed/"))
        .await
        .expect("esri fixture");
    assert_eq!(esri.len(), 2);

    let missing = reader
        .read_feed(&FeedSource::new("https://unknown.example/feed"))
        .await;
    assert!(missing.is_err());
}
