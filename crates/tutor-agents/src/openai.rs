use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tutor_common::{Error, Result};

use crate::providers::{ChatMessage, ChatRole, LlmProvider, LlmRequest, LlmResponse, Usage};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions backend.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build OpenAI client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn provider_id(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let openai_request = convert_request(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| Error::Agent(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Agent(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| Error::Agent(format!("Failed to parse OpenAI response: {}", e)))?;

        convert_response(openai_response)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);
        let response = self.client.get(&url).bearer_auth(&self.api_key).send().await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

fn convert_request(request: &LlmRequest) -> OpenAiRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(system_prompt) = &request.system {
        messages.push(OpenAiMessage {
            role: "system",
            content: system_prompt.clone(),
        });
    }
    messages.extend(request.messages.iter().map(convert_message));

    OpenAiRequest {
        model: request.model.clone(),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        response_format: request
            .json_output
            .then_some(OpenAiResponseFormat { kind: "json_object" }),
    }
}

fn convert_message(msg: &ChatMessage) -> OpenAiMessage {
    let role = match msg.role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    };
    OpenAiMessage {
        role,
        content: msg.content.clone(),
    }
}

fn convert_response(response: OpenAiResponse) -> Result<LlmResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::Agent("No choices in response".to_string()))?;

    Ok(LlmResponse {
        text: choice.message.content.unwrap_or_default(),
        model: response.model,
        usage: response.usage.map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
        stop_reason: choice.finish_reason,
    })
}

// Request Types
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAiResponseFormat>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct OpenAiResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

// Response Types
#[derive(Deserialize)]
struct OpenAiResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json_output: bool) -> LlmRequest {
        LlmRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("Hello")],
            system: Some("Extract parameters.".to_string()),
            max_tokens: Some(512),
            temperature: Some(0.1),
            json_output,
        }
    }

    #[test]
    fn system_prompt_leads_messages() {
        let body = serde_json::to_value(convert_request(&request(false))).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert_eq!(body["max_tokens"], 512);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn json_output_sets_response_format() {
        let body = serde_json::to_value(convert_request(&request(true))).unwrap();
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let response = OpenAiResponse {
            model: "gpt".to_string(),
            choices: vec![],
            usage: None,
        };
        assert!(matches!(convert_response(response), Err(Error::Agent(_))));
    }
}
