use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::dispatch::mailer::Mailer;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Pluggable mail backend. SmtpMailer when a relay is configured,
    /// LogMailer otherwise. Swapped at startup from config.
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
