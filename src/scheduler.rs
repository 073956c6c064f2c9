// src/scheduler.rs
use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime, NaiveTime};
use metrics::{counter, gauge};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::DigestConfig;
use crate::digest::{render_html, subject_line};
use crate::ingest::extract::FallbackExtractor;
use crate::ingest::types::{CandidateItem, FeedReader, PageFetcher};
use crate::notify::DigestSink;
use crate::select::select_top;

pub const DEFAULT_DAILY_AT: &str = "08:00";

/// Outcome of one digest run.
#[derive(Debug, Clone)]
pub struct DigestRun {
    pub candidates: usize,
    pub selected: Vec<CandidateItem>,
    pub subject: String,
    pub html: String,
    /// Sinks that accepted the digest.
    pub delivered: usize,
}

/// Everything one digest run needs, owned so it can live in a task.
pub struct DigestJob<P: PageFetcher> {
    pub cfg: DigestConfig,
    pub reader: Box<dyn FeedReader>,
    pub extractor: FallbackExtractor<P>,
    pub sinks: Vec<Box<dyn DigestSink>>,
}

impl<P: PageFetcher + 'static> DigestJob<P> {
    /// ingest → select → render → deliver. Delivery errors are logged only.
    pub async fn run_once(&self) -> DigestRun {
        tracing::info!(target: "digest", "starting to fetch AI & GIS news");
        let items = crate::ingest::run_once(&self.cfg, self.reader.as_ref(), &self.extractor).await;
        let candidates = items.len();
        tracing::info!(target: "digest", candidates, "found potential articles");

        let selected = select_top(items, self.cfg.max_articles);
        tracing::info!(target: "digest", selected = selected.len(), "selected top articles");

        let now = Local::now();
        let short_date = now.format("%Y-%m-%d").to_string();
        let long_date = now.format("%A, %B %d, %Y").to_string();
        let subject = subject_line(&short_date);
        let html = render_html(&selected, &long_date, &short_date);

        let mut delivered = 0usize;
        for sink in &self.sinks {
            match sink.deliver(&subject, &html).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::info!(target: "digest", sink = sink.name(), articles = selected.len(), "digest delivered");
                }
                Err(e) => {
                    tracing::warn!(target: "digest", sink = sink.name(), error = ?e, "failed to deliver digest");
                }
            }
        }

        counter!("digest_runs_total").increment(1);
        DigestRun {
            candidates,
            selected,
            subject,
            html,
            delivered,
        }
    }

    /// Run every day at `at` (local time). The first run waits for the next slot.
    pub fn spawn_daily(self: Arc<Self>, at: NaiveTime) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let wait = duration_until(Local::now().naive_local(), at);
                tracing::info!(target: "digest", %at, wait_secs = wait.as_secs(), "next digest scheduled");
                tokio::time::sleep(wait).await;

                let run = self.run_once().await;
                let now = chrono::Utc::now().timestamp().max(0) as u64;
                gauge!("digest_last_scheduled_run_ts").set(now as f64);
                tracing::info!(
                    target: "digest",
                    candidates = run.candidates,
                    selected = run.selected.len(),
                    delivered = run.delivered,
                    "scheduled digest tick"
                );
            }
        })
    }
}

/// `HH:MM` → time of day; `off`/`none`/empty → no schedule.
pub fn parse_schedule(raw: &str) -> Result<Option<NaiveTime>> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("off") || s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .map(Some)
        .map_err(|e| anyhow!("invalid schedule time {s:?} (expected HH:MM): {e}"))
}

/// Time left until the next occurrence of `at` after `now`.
pub fn duration_until(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let today = now.date().and_time(at);
    let next = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or_default()
}
