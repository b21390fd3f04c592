use serde::{Deserialize, Serialize};

/// Top-level configuration, usually read from `~/.tutor/config.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub llm: LlmConfig,
    pub tools: ToolsConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit: RateLimitConfig,
    /// Longest student message accepted by the HTTP endpoints.
    pub max_message_chars: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            rate_limit: RateLimitConfig::default(),
            max_message_chars: 8000,
        }
    }
}

/// Per-IP request rate limit for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub per_second: u64,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 1,
            burst_size: 60,
        }
    }
}

/// Text-generation backend used for parameter extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.1,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

/// Endpoints and transport policy for the educational tool APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub use_mock: bool,
    pub note_maker_url: String,
    pub flashcard_url: String,
    pub concept_explainer_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            use_mock: false,
            note_maker_url: "http://localhost:8001/api/note-maker".to_string(),
            flashcard_url: "http://localhost:8002/api/flashcards".to_string(),
            concept_explainer_url: "http://localhost:8003/api/concept-explainer".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `info` or `tutor_agents=debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
