//! Sends a plain-text test email with the configured SMTP settings.

use anyhow::Context;
use geo_ai_digest::config::DigestConfig;
use geo_ai_digest::notify::EmailSender;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    geo_ai_digest::init_tracing();

    let cfg = DigestConfig::load_default().context("loading digest config")?;
    let sender = EmailSender::from_config(&cfg.email)?;

    let sent_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    sender.send_test(&sent_at).await?;

    println!("Test email sent successfully! Check your inbox (and spam folder).");
    Ok(())
}
