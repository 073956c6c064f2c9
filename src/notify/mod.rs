// src/notify/mod.rs
pub mod email;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

pub use email::EmailSender;

/// Where a rendered digest goes.
#[async_trait::async_trait]
pub trait DigestSink: Send + Sync {
    async fn deliver(&self, subject: &str, html: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

// Lets callers keep a handle on a sink the job owns.
#[async_trait::async_trait]
impl<T: DigestSink + ?Sized> DigestSink for Arc<T> {
    async fn deliver(&self, subject: &str, html: &str) -> Result<()> {
        (**self).deliver(subject, html).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[async_trait::async_trait]
impl DigestSink for EmailSender {
    async fn deliver(&self, subject: &str, html: &str) -> Result<()> {
        self.send_digest(subject, html).await
    }

    fn name(&self) -> &'static str {
        "email"
    }
}

/// Writes the HTML to a file for previewing in a browser.
pub struct FileSink {
    pub path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl DigestSink for FileSink {
    async fn deliver(&self, _subject: &str, html: &str) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        tokio::fs::write(&self.path, html)
            .await
            .with_context(|| format!("writing preview to {}", self.path.display()))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

// --- Test helper ---
pub struct MockSink {
    pub calls: std::sync::Mutex<Vec<(String, String)>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            calls: std::sync::Mutex::new(vec![]),
        }
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DigestSink for MockSink {
    async fn deliver(&self, subject: &str, html: &str) -> Result<()> {
        self.calls
            .lock()
            .map_err(|_| anyhow::anyhow!("mock sink poisoned"))?
            .push((subject.to_string(), html.to_string()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
