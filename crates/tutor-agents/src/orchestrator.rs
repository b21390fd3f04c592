use std::sync::Arc;

use tracing::{error, info, instrument};
use tutor_common::{ConversationTurn, LearnerProfile, Result};
use uuid::Uuid;

use crate::extraction::ParameterExtractor;
use crate::params::{ExtractionResult, ToolKind};
use crate::personalize::validate_and_fill;
use crate::response::{OrchestratorResponse, PipelineOutcome, assemble};
use crate::tools::{
    ConceptExplainerRequest, FlashcardRequest, NoteMakerRequest, ToolClient, ToolResponse,
};

const GENERIC_QUESTION: &str = "Could you provide more details about what you need?";

/// An extraction after default-filling, plus the error flag raised if the
/// filled record is unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub extraction: ExtractionResult,
    pub error: Option<String>,
}

impl Validated {
    pub fn new(extraction: ExtractionResult) -> Self {
        let error = extraction
            .validate()
            .err()
            .map(|e| format!("Failed to analyze message: {}", e));
        Self { extraction, error }
    }
}

/// Where a validated extraction goes next.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Error(String),
    Clarify(Vec<String>),
    Dispatch(ToolKind),
}

/// Pure routing decision. An error flag wins, then any missing parameter,
/// then the selected tool.
pub fn route(validated: &Validated) -> Route {
    if let Some(error) = &validated.error {
        return Route::Error(error.clone());
    }
    if validated.extraction.needs_clarification() {
        return Route::Clarify(clarification_questions(
            &validated.extraction.missing_parameters,
        ));
    }
    Route::Dispatch(validated.extraction.tool_needed)
}

/// One question per recognised missing parameter, in order.
pub fn clarification_questions(missing: &[String]) -> Vec<String> {
    let questions: Vec<String> = missing
        .iter()
        .filter_map(|param| match param.as_str() {
            "topic" => Some("What specific topic would you like to focus on?"),
            "subject" => Some("Which subject area does this relate to?"),
            "difficulty" => Some("What difficulty level would you prefer? (easy, medium, or hard)"),
            "count" => Some("How many flashcards would you like? (1-20)"),
            _ => None,
        })
        .map(ToString::to_string)
        .collect();

    if questions.is_empty() {
        vec![GENERIC_QUESTION.to_string()]
    } else {
        questions
    }
}

/// Runs one student message through extraction, default-filling, routing and
/// at most one tool call.
///
/// Holds only shared, immutable clients, so a single instance serves
/// concurrent requests.
pub struct Orchestrator {
    extractor: Arc<ParameterExtractor>,
    tools: Arc<dyn ToolClient>,
}

impl Orchestrator {
    pub fn new(extractor: Arc<ParameterExtractor>, tools: Arc<dyn ToolClient>) -> Self {
        Self { extractor, tools }
    }

    pub fn extractor(&self) -> &ParameterExtractor {
        &self.extractor
    }

    pub fn tool_client_id(&self) -> &str {
        self.tools.client_id()
    }

    /// Full pipeline, assembled into the public response shape.
    pub async fn orchestrate(
        &self,
        message: &str,
        profile: &LearnerProfile,
        history: &[ConversationTurn],
    ) -> OrchestratorResponse {
        assemble(&self.run(message, profile, history).await)
    }

    /// Extraction and default-filling only; no tool is called.
    pub async fn analyze(
        &self,
        message: &str,
        profile: &LearnerProfile,
        history: &[ConversationTurn],
    ) -> Validated {
        let extracted = self.extractor.extract(message, profile, history).await;
        Validated::new(validate_and_fill(extracted, profile))
    }

    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), user_id = %profile.user_id))]
    pub async fn run(
        &self,
        message: &str,
        profile: &LearnerProfile,
        history: &[ConversationTurn],
    ) -> PipelineOutcome {
        info!("orchestration started");
        let validated = self.analyze(message, profile, history).await;

        let outcome = match route(&validated) {
            Route::Error(reason) => {
                error!(error = %reason, "extraction unusable");
                PipelineOutcome::Error(reason)
            }
            Route::Clarify(questions) => {
                info!(
                    missing = ?validated.extraction.missing_parameters,
                    "clarification needed"
                );
                PipelineOutcome::NeedsClarification {
                    extraction: validated.extraction,
                    questions,
                }
            }
            Route::Dispatch(kind) => {
                match ToolCall::prepare(kind, &validated.extraction, profile, history) {
                    Some(call) => self.dispatch(kind, call, validated.extraction).await,
                    None => {
                        info!("no tool needed");
                        PipelineOutcome::NoToolNeeded {
                            extraction: validated.extraction,
                        }
                    }
                }
            }
        };

        info!(tool_used = outcome.tool_used(), "orchestration finished");
        outcome
    }

    async fn dispatch(
        &self,
        kind: ToolKind,
        call: Result<ToolCall>,
        extraction: ExtractionResult,
    ) -> PipelineOutcome {
        info!(tool = %kind, "executing tool");

        let result = match call {
            Ok(call) => self.call_tool(call).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(response) => {
                info!(tool = %kind, "tool executed successfully");
                PipelineOutcome::ToolSuccess {
                    extraction,
                    response,
                }
            }
            Err(e) => {
                error!(tool = %kind, error = %e, "tool execution failed");
                PipelineOutcome::Error(format!("Tool execution failed: {}", e))
            }
        }
    }

    async fn call_tool(&self, call: ToolCall) -> Result<ToolResponse> {
        Ok(match call {
            ToolCall::Notes(request) => {
                ToolResponse::Notes(self.tools.create_notes(&request).await?)
            }
            ToolCall::Flashcards(request) => {
                ToolResponse::Flashcards(self.tools.generate_flashcards(&request).await?)
            }
            ToolCall::Explain(request) => {
                ToolResponse::Explanation(self.tools.explain_concept(&request).await?)
            }
        })
    }
}

/// A ready-to-send request for one of the three tools.
#[derive(Debug)]
enum ToolCall {
    Notes(NoteMakerRequest),
    Flashcards(FlashcardRequest),
    Explain(ConceptExplainerRequest),
}

impl ToolCall {
    /// Build the request `kind` selects. `None` when no tool is selected.
    fn prepare(
        kind: ToolKind,
        extraction: &ExtractionResult,
        profile: &LearnerProfile,
        history: &[ConversationTurn],
    ) -> Option<Result<Self>> {
        let call = match kind {
            ToolKind::NoteMaker => {
                NoteMakerRequest::from_extraction(extraction, profile, history).map(Self::Notes)
            }
            ToolKind::FlashcardGenerator => {
                FlashcardRequest::from_extraction(extraction, profile).map(Self::Flashcards)
            }
            ToolKind::ConceptExplainer => {
                ConceptExplainerRequest::from_extraction(extraction, profile, history)
                    .map(Self::Explain)
            }
            ToolKind::NoTool => return None,
        };
        Some(call)
    }
}
