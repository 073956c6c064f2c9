// src/config/email.rs
use serde::Deserialize;
use std::env;

pub const ENV_SENDER: &str = "NEWS_SENDER_EMAIL";
pub const ENV_RECIPIENT: &str = "NEWS_RECIPIENT_EMAIL";
pub const ENV_PASSWORD: &str = "NEWS_EMAIL_PASSWORD";
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_smtp_port() -> u16 {
    587
}

/// SMTP delivery settings. Secrets normally come from the environment.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// STARTTLS port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub sender: Option<String>,
    /// Defaults to the sender when absent.
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            sender: None,
            recipient: None,
            password: None,
        }
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("password_len", &self.password.as_ref().map(|p| p.len()))
            .finish()
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl EmailConfig {
    /// Environment wins over file values.
    pub fn apply_env(&mut self) {
        if let Some(v) = env_non_empty(ENV_SMTP_HOST) {
            self.smtp_host = v;
        }
        if let Some(port) = env_non_empty(ENV_SMTP_PORT).and_then(|v| v.parse::<u16>().ok()) {
            self.smtp_port = port;
        }
        if let Some(v) = env_non_empty(ENV_SENDER) {
            self.sender = Some(v);
        }
        if let Some(v) = env_non_empty(ENV_RECIPIENT) {
            self.recipient = Some(v);
        }
        if let Some(v) = env_non_empty(ENV_PASSWORD) {
            self.password = Some(v);
        }
    }

    pub fn sender(&self) -> Option<&str> {
        non_empty(&self.sender)
    }

    pub fn recipient(&self) -> Option<&str> {
        non_empty(&self.recipient).or_else(|| self.sender())
    }

    pub fn password(&self) -> Option<&str> {
        non_empty(&self.password)
    }

    /// Sender, recipient and password are all known.
    pub fn is_complete(&self) -> bool {
        self.sender().is_some() && self.recipient().is_some() && self.password().is_some()
    }
}
