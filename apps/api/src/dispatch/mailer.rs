//! Mail backends — a pluggable `Mailer` trait with an SMTP implementation
//! and a log-only fallback for environments without a relay.
//!
//! `AppState` holds an `Arc<dyn Mailer>`, swapped at startup from config.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid recipient address '{0}'")]
    Address(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// The mail backend trait. Implement this to swap transports without touching
/// the dispatch loop or handler code.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Sends mail through a real SMTP relay via lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .with_context(|| format!("Invalid SMTP relay host '{}'", config.host))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = config
            .from_address
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid SMTP_FROM address '{}'", config.from_address))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let to_mailbox = to
            .parse::<Mailbox>()
            .map_err(|_| MailError::Address(to.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::Transport(format!("failed to build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Logs outbound mail instead of sending it. Used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        info!(
            "LogMailer: would send to {} — subject '{}' ({} bytes)",
            to,
            subject,
            body.len()
        );
        Ok(())
    }
}
