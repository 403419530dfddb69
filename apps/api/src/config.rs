use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub groq_api_key: String,
    /// SMTP relay settings. None means no relay is configured and outbound
    /// mail falls back to the log-only mailer.
    pub smtp: Option<SmtpConfig>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// From address for all outbound RFP mail, e.g. "Procura <rfp@example.com>".
    pub from_address: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            smtp: SmtpConfig::from_env()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl SmtpConfig {
    /// SMTP is opt-in: the block is only built when SMTP_HOST is set, and the
    /// remaining variables become required at that point.
    fn from_env() -> Result<Option<Self>> {
        let host = match std::env::var("SMTP_HOST") {
            Ok(h) if !h.trim().is_empty() => h,
            _ => return Ok(None),
        };

        Ok(Some(SmtpConfig {
            host,
            port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            username: require_env("SMTP_USERNAME")?,
            password: require_env("SMTP_PASSWORD")?,
            from_address: require_env("SMTP_FROM")?,
        }))
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
