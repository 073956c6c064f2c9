//! AI & GIS Daily Digest: binary entrypoint
//! Runs the digest once, then (unless disabled) daily at `DIGEST_SCHEDULE`.

use std::sync::Arc;

use anyhow::Context;
use geo_ai_digest::config::DigestConfig;
use geo_ai_digest::ingest::extract::{FallbackExtractor, HttpPageFetcher};
use geo_ai_digest::ingest::providers::rss::RssFeedReader;
use geo_ai_digest::notify::{DigestSink, EmailSender, FileSink};
use geo_ai_digest::scheduler::{parse_schedule, DigestJob, DEFAULT_DAILY_AT};

const ENV_SCHEDULE: &str = "DIGEST_SCHEDULE";
const ENV_PREVIEW_PATH: &str = "DIGEST_PREVIEW_PATH";

fn build_sinks(cfg: &DigestConfig) -> Vec<Box<dyn DigestSink>> {
    let mut sinks: Vec<Box<dyn DigestSink>> = Vec::new();

    if cfg.email.is_complete() {
        match EmailSender::from_config(&cfg.email) {
            Ok(sender) => {
                tracing::info!(to = %sender.recipient(), "email delivery enabled");
                sinks.push(Box::new(sender));
            }
            Err(e) => tracing::warn!(error = ?e, "email delivery disabled"),
        }
    } else {
        tracing::warn!("email delivery disabled: sender/recipient/password not configured");
    }

    if let Ok(p) = std::env::var(ENV_PREVIEW_PATH) {
        if !p.trim().is_empty() {
            sinks.push(Box::new(FileSink::new(p.trim())));
        }
    }
    sinks
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    geo_ai_digest::init_tracing();

    let cfg = DigestConfig::load_default().context("loading digest config")?;
    let schedule = parse_schedule(
        &std::env::var(ENV_SCHEDULE).unwrap_or_else(|_| DEFAULT_DAILY_AT.to_string()),
    )?;
    tracing::info!(
        feeds = cfg.feeds.len(),
        keywords = cfg.keywords.len(),
        max_articles = cfg.max_articles,
        "AI & GIS Daily Digest"
    );

    let sinks = build_sinks(&cfg);
    let extractor = FallbackExtractor::new(HttpPageFetcher::new()).with_timeout(cfg.fetch_timeout());
    let reader = RssFeedReader::http_with_timeout(cfg.fetch_timeout());

    let job = Arc::new(DigestJob {
        cfg,
        reader: Box::new(reader),
        extractor,
        sinks,
    });

    // Initial run right away.
    let run = job.run_once().await;
    tracing::info!(
        candidates = run.candidates,
        selected = run.selected.len(),
        delivered = run.delivered,
        "initial digest finished"
    );

    let Some(at) = schedule else {
        return Ok(());
    };

    tracing::info!(%at, "scheduler started; press Ctrl+C to exit");
    let handle = job.spawn_daily(at);
    tokio::select! {
        res = handle => {
            res.context("scheduler task")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }
    Ok(())
}
