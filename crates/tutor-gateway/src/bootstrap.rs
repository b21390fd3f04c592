use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tutor_agents::tools::ToolEndpoints;
use tutor_agents::{
    HttpToolClient, LlmProvider, MockToolClient, OpenAiProvider, Orchestrator, ParameterExtractor,
    ToolClient,
};
use tutor_common::{Error, Result};
use tutor_config::{AppConfig, LlmConfig, ToolsConfig};

/// Wire the LLM provider, extractor and tool client described by `config`.
pub fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator> {
    let provider = build_provider(&config.llm)?;
    let extractor = ParameterExtractor::new(provider, config.llm.model.clone())
        .with_temperature(config.llm.temperature)
        .with_max_tokens(config.llm.max_tokens);

    let tools = build_tool_client(&config.tools)?;
    info!(
        llm = %config.llm.provider,
        model = %config.llm.model,
        tools = tools.client_id(),
        "orchestrator initialized"
    );

    Ok(Orchestrator::new(Arc::new(extractor), tools))
}

pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    Error::Config("llm.api_key is not set (or export OPENAI_API_KEY)".to_string())
                })?;
            let provider = OpenAiProvider::new(
                api_key,
                config.base_url.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Arc::new(provider))
        }
        other => Err(Error::Config(format!("unsupported LLM provider: {}", other))),
    }
}

pub fn build_tool_client(config: &ToolsConfig) -> Result<Arc<dyn ToolClient>> {
    if config.use_mock {
        return Ok(Arc::new(MockToolClient::new()));
    }

    let endpoints = ToolEndpoints {
        note_maker: config.note_maker_url.clone(),
        flashcards: config.flashcard_url.clone(),
        concept_explainer: config.concept_explainer_url.clone(),
    };
    let client = HttpToolClient::new(endpoints, Duration::from_secs(config.timeout_secs))?
        .with_retry_policy(
            config.max_retries,
            Duration::from_millis(config.backoff_base_ms),
        );
    Ok(Arc::new(client))
}
