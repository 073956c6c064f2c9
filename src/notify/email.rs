use anyhow::{anyhow, Context, Result};
use lettre::message::{header, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use crate::config::EmailConfig;

pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSender {
    /// Build a STARTTLS sender from explicit settings.
    pub fn from_config(cfg: &EmailConfig) -> Result<Self> {
        let from_addr = cfg.sender().ok_or_else(|| anyhow!("email sender missing"))?;
        let to_addr = cfg
            .recipient()
            .ok_or_else(|| anyhow!("email recipient missing"))?;
        let pass = cfg
            .password()
            .ok_or_else(|| anyhow!("email password missing"))?;

        let from = from_addr
            .parse::<Mailbox>()
            .context("invalid sender address")?;
        let to = to_addr
            .parse::<Mailbox>()
            .context("invalid recipient address")?;

        let creds = Credentials::new(from_addr.to_string(), pass.to_string());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)
            .with_context(|| format!("invalid SMTP host {}", cfg.smtp_host))?
            .port(cfg.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, from, to })
    }

    pub fn recipient(&self) -> &Mailbox {
        &self.to
    }

    /// Send the rendered digest as an HTML message.
    pub async fn send_digest(&self, subject: &str, html: &str) -> Result<()> {
        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .multipart(MultiPart::alternative().singlepart(SinglePart::html(html.to_string())))
            .context("build digest email")?;

        self.mailer.send(msg).await.context("send digest email")?;
        Ok(())
    }

    /// Plain-text message to verify SMTP settings.
    pub async fn send_test(&self, sent_at: &str) -> Result<()> {
        let body = format!(
            "This is a test email from the AI & GIS digest.\n\nSent at: {sent_at}\n\nIf you received this email, your configuration is working correctly!\n"
        );
        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.from.clone())
            .subject("Test Email from AI & GIS Digest")
            .header(header::ContentType::TEXT_PLAIN)
            .body(body)
            .context("build test email")?;

        self.mailer.send(msg).await.context("send test email")?;
        Ok(())
    }
}
