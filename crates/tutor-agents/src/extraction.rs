use std::sync::Arc;

use tracing::{info, instrument, warn};
use tutor_common::{ConversationTurn, Error, LearnerProfile, Result};

use crate::params::ExtractionResult;
use crate::prompts::{EXTRACTION_SYSTEM_PROMPT, build_extraction_prompt};
use crate::providers::{ChatMessage, LlmProvider, LlmRequest};

/// Turns a student message into an [`ExtractionResult`] using an LLM.
pub struct ParameterExtractor {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f64,
    max_tokens: Option<u32>,
}

impl ParameterExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.1,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn provider_id(&self) -> &str {
        self.provider.provider_id()
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.provider.health_check().await
    }

    /// Extract tool parameters. Never fails: any provider or parse failure
    /// yields [`ExtractionResult::fallback`].
    #[instrument(skip_all, fields(provider = self.provider.provider_id()))]
    pub async fn extract(
        &self,
        message: &str,
        profile: &LearnerProfile,
        history: &[ConversationTurn],
    ) -> ExtractionResult {
        let request = self.build_request(message, profile, history);

        let response = match self.provider.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "extraction call failed");
                return ExtractionResult::fallback(format!("Failed to call language model: {}", e));
            }
        };

        match parse_extraction(&response.text) {
            Ok(result) => {
                info!(
                    tool = %result.tool_needed,
                    confidence = result.confidence,
                    missing = ?result.missing_parameters,
                    "extracted parameters"
                );
                result
            }
            Err(e) => {
                warn!(error = %e, "could not parse extraction output");
                ExtractionResult::fallback(format!("Failed to parse LLM response: {}", e))
            }
        }
    }

    fn build_request(
        &self,
        message: &str,
        profile: &LearnerProfile,
        history: &[ConversationTurn],
    ) -> LlmRequest {
        LlmRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(build_extraction_prompt(
                message, profile, history,
            ))],
            system: Some(EXTRACTION_SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
            json_output: true,
        }
    }
}

/// Parse raw model output into a validated [`ExtractionResult`].
///
/// Tolerates prose or markdown fences around the JSON object.
pub fn parse_extraction(raw: &str) -> Result<ExtractionResult> {
    let json = json_object_span(raw)
        .ok_or_else(|| Error::Agent("no JSON object in model output".to_string()))?;
    let result: ExtractionResult = serde_json::from_str(json)?;
    result.validate()?;
    Ok(result)
}

fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tutor_common::ConversationTurn;

    use super::*;
    use crate::params::{Difficulty, ToolKind};
    use crate::providers::LlmResponse;

    struct ScriptedProvider {
        reply: Result<String>,
        seen: Mutex<Vec<LlmRequest>>,
    }

    impl ScriptedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(Error::Agent("connection refused".to_string())),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn provider_id(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(LlmResponse {
                    text: text.clone(),
                    model: request.model.clone(),
                    usage: None,
                    stop_reason: Some("stop".to_string()),
                }),
                Err(e) => Err(Error::Agent(e.to_string())),
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    fn profile() -> LearnerProfile {
        LearnerProfile {
            user_id: "test_student".to_string(),
            name: "Test Student".to_string(),
            grade_level: "10".to_string(),
            learning_style_summary: "Visual learner, prefers examples".to_string(),
            emotional_state_summary: "Focused and motivated".to_string(),
            mastery_level_summary: "Level 5 - Developing competence".to_string(),
        }
    }

    fn assert_fallback(result: &ExtractionResult) {
        assert_eq!(result.tool_needed, ToolKind::NoTool);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.missing_parameters, vec!["all".to_string()]);
    }

    #[tokio::test]
    async fn malformed_outputs_degrade_to_fallback() {
        let outputs = [
            "",
            "Sure! I think they want flashcards.",
            "{not json}",
            r#"{"tool_needed": "quiz_maker", "confidence": 0.9, "reasoning": "x"}"#,
            r#"{"tool_needed": "flashcard_generator", "confidence": 0.9, "flashcard_count": 50, "reasoning": "x"}"#,
            r#"{"tool_needed": "concept_explainer", "confidence": 1.7, "reasoning": "x"}"#,
            r#"{"tool_needed": "note_maker", "confidence": 0.9}"#,
            "} backwards {",
        ];

        for output in outputs {
            let extractor = ParameterExtractor::new(Arc::new(ScriptedProvider::replying(output)), "gpt");
            let result = extractor.extract("help", &profile(), &[]).await;
            assert_fallback(&result);
            assert!(
                result.reasoning.starts_with("Failed to parse LLM response"),
                "output {output:?} gave reasoning {:?}",
                result.reasoning
            );
        }
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_fallback() {
        let extractor = ParameterExtractor::new(Arc::new(ScriptedProvider::failing()), "gpt");
        let result = extractor.extract("help", &profile(), &[]).await;
        assert_fallback(&result);
        assert!(result.reasoning.contains("connection refused"));
    }

    #[tokio::test]
    async fn parses_fenced_output() {
        let output = "```json\n{\"tool_needed\": \"flashcard_generator\", \"confidence\": 0.85, \
                      \"topic\": \"derivatives\", \"subject\": \"calculus\", \"difficulty\": \"medium\", \
                      \"reasoning\": \"asked for practice\"}\n```";
        let extractor = ParameterExtractor::new(Arc::new(ScriptedProvider::replying(output)), "gpt");
        let result = extractor
            .extract("I need practice problems on derivatives", &profile(), &[])
            .await;

        assert_eq!(result.tool_needed, ToolKind::FlashcardGenerator);
        assert_eq!(result.topic.as_deref(), Some("derivatives"));
        assert_eq!(result.difficulty, Some(Difficulty::Medium));
        assert!(result.flashcard_count.is_none());
    }

    #[tokio::test]
    async fn request_carries_context_and_settings() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"{"tool_needed": "none", "confidence": 0.95, "reasoning": "greeting"}"#,
        ));
        let extractor = ParameterExtractor::new(provider.clone(), "gpt-4")
            .with_temperature(0.0)
            .with_max_tokens(Some(400));
        let history = vec![
            ConversationTurn::user("I'm learning about biology"),
            ConversationTurn::assistant("Great! What topic in biology?"),
        ];

        let result = extractor.extract("Hello! How are you today?", &profile(), &history).await;
        assert_eq!(result.tool_needed, ToolKind::NoTool);

        let seen = provider.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, Some(400));
        assert!(request.json_output);
        assert!(request.system.as_deref().unwrap().contains("OUTPUT SCHEMA"));
        let content = &request.messages[0].content;
        assert!(content.contains("ASSISTANT: Great! What topic in biology?"));
        assert!(content.contains("Hello! How are you today?"));
    }

    #[test]
    fn parse_rejects_missing_object() {
        assert!(matches!(parse_extraction("no braces"), Err(Error::Agent(_))));
    }
}
