use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use tutor_common::{Error, Result};

use super::schema::{
    ConceptExplainerRequest, ConceptExplainerResponse, FlashcardRequest, FlashcardResponse,
    NoteMakerRequest, NoteMakerResponse,
};
use super::ToolClient;
use crate::params::ToolKind;

/// URLs of the three tool APIs.
#[derive(Debug, Clone)]
pub struct ToolEndpoints {
    pub note_maker: String,
    pub flashcards: String,
    pub concept_explainer: String,
}

/// Calls the tool APIs over HTTP, retrying rate limits, server errors and
/// timeouts with exponential backoff.
#[derive(Clone)]
pub struct HttpToolClient {
    client: Client,
    endpoints: ToolEndpoints,
    max_retries: u32,
    backoff_base: Duration,
}

impl HttpToolClient {
    pub fn new(endpoints: ToolEndpoints, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build tool client: {}", e)))?;

        Ok(Self {
            client,
            endpoints,
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        })
    }

    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base: Duration) -> Self {
        self.max_retries = max_retries;
        self.backoff_base = backoff_base;
        self
    }

    /// Delay before retry number `attempt + 1`: `base * 2^attempt`.
    fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// One POST with the body read in full, so a stalled body counts as a
    /// timeout of the call.
    async fn send<Req: Serialize + Sync>(
        &self,
        url: &str,
        payload: &Req,
    ) -> reqwest::Result<(StatusCode, Vec<u8>)> {
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }

    async fn post_json<Req, Resp>(&self, tool: ToolKind, url: &str, payload: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            match self.send(url, payload).await {
                Ok((status, body)) => {
                    if status.is_success() {
                        return serde_json::from_slice::<Resp>(&body).map_err(|e| {
                            Error::Tool(format!("{} returned an unexpected response: {}", tool, e))
                        });
                    }
                    if status == StatusCode::BAD_REQUEST {
                        let detail = bad_request_detail(&body);
                        return Err(Error::Tool(format!("{} rejected the request: {}", tool, detail)));
                    }
                    if !is_retryable(status) {
                        return Err(Error::Tool(format!(
                            "{} returned unexpected status {}",
                            tool, status
                        )));
                    }
                    if attempt >= self.max_retries {
                        return Err(Error::Tool(format!(
                            "{} still failing after {} retries ({})",
                            tool, attempt, status
                        )));
                    }
                    warn!(%tool, %status, attempt, "tool call failed, retrying");
                }
                Err(e) if e.is_timeout() => {
                    if attempt >= self.max_retries {
                        return Err(Error::Tool(format!(
                            "{} timed out after {} retries",
                            tool, attempt
                        )));
                    }
                    warn!(%tool, attempt, "tool call timed out, retrying");
                }
                Err(e) => {
                    return Err(Error::Tool(format!("network error calling {}: {}", tool, e)));
                }
            }

            tokio::time::sleep(self.backoff(attempt)).await;
            attempt += 1;
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn bad_request_detail(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("error").and_then(|v| v.as_str()).map(ToString::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

#[async_trait]
impl ToolClient for HttpToolClient {
    fn client_id(&self) -> &str {
        "http"
    }

    async fn create_notes(&self, request: &NoteMakerRequest) -> Result<NoteMakerResponse> {
        info!(topic = %request.topic, "calling note maker");
        self.post_json(ToolKind::NoteMaker, &self.endpoints.note_maker, request)
            .await
    }

    async fn generate_flashcards(&self, request: &FlashcardRequest) -> Result<FlashcardResponse> {
        info!(topic = %request.topic, count = request.count.get(), "calling flashcard generator");
        self.post_json(ToolKind::FlashcardGenerator, &self.endpoints.flashcards, request)
            .await
    }

    async fn explain_concept(
        &self,
        request: &ConceptExplainerRequest,
    ) -> Result<ConceptExplainerResponse> {
        info!(concept = %request.concept_to_explain, "calling concept explainer");
        self.post_json(
            ToolKind::ConceptExplainer,
            &self.endpoints.concept_explainer,
            request,
        )
        .await
    }
}
