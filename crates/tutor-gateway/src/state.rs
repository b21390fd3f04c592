use std::sync::Arc;

use chrono::{DateTime, Utc};
use tutor_agents::Orchestrator;
use tutor_config::AppConfig;
use tutor_security::InputValidator;

/// Shared gateway state. Everything in here is read-only after startup.
pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: Orchestrator,
    pub validator: InputValidator,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig, orchestrator: Orchestrator) -> Self {
        let validator = InputValidator::new(config.gateway.max_message_chars);
        Self {
            config,
            orchestrator,
            validator,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
