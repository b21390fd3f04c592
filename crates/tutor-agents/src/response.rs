use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::params::{ExtractionResult, ToolKind};
use crate::tools::ToolResponse;

/// Terminal result of one pipeline run. Exactly one per request.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Error(String),
    NeedsClarification {
        extraction: ExtractionResult,
        questions: Vec<String>,
    },
    ToolSuccess {
        extraction: ExtractionResult,
        response: ToolResponse,
    },
    NoToolNeeded {
        extraction: ExtractionResult,
    },
}

impl PipelineOutcome {
    /// Wire name reported as `tool_used`.
    pub fn tool_used(&self) -> &'static str {
        match self {
            PipelineOutcome::ToolSuccess { response, .. } => response.kind().as_str(),
            _ => ToolKind::NoTool.as_str(),
        }
    }
}

/// Public response shape returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorResponse {
    pub success: bool,
    pub tool_used: String,
    #[serde(default)]
    pub extracted_parameters: Map<String, Value>,
    #[serde(default)]
    pub tool_response: Map<String, Value>,
    pub message: String,
    #[serde(default)]
    pub needs_clarification: bool,
    #[serde(default)]
    pub clarification_questions: Vec<String>,
}

const CLARIFICATION_MESSAGE: &str = "I need a bit more information to help you better.";
const NO_TOOL_MESSAGE: &str = "I'm here to help! What would you like to learn about?";
const NO_TOOL_PAYLOAD: &str =
    "I'm here to help! Feel free to ask about concepts, request notes, or practice with flashcards.";

fn to_map<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn success_message(response: &ToolResponse) -> String {
    match response {
        ToolResponse::Notes(notes) => format!(
            "I've created structured notes on **{}** for you! Check out the sections below.",
            notes.topic
        ),
        ToolResponse::Flashcards(cards) => format!(
            "I've generated **{} flashcards** on {} to help you practice!",
            cards.flashcards.len(),
            cards.topic
        ),
        ToolResponse::Explanation(_) => "Here's an explanation of the concept you asked about. \
             Let me know if you need more detail!"
            .to_string(),
    }
}

/// Map an outcome to the public response. Total and deterministic.
pub fn assemble(outcome: &PipelineOutcome) -> OrchestratorResponse {
    let tool_used = outcome.tool_used().to_string();

    match outcome {
        PipelineOutcome::Error(error) => OrchestratorResponse {
            success: false,
            tool_used,
            extracted_parameters: Map::new(),
            tool_response: Map::new(),
            message: format!("Sorry, something went wrong: {}", error),
            needs_clarification: false,
            clarification_questions: Vec::new(),
        },
        PipelineOutcome::NeedsClarification {
            extraction,
            questions,
        } => OrchestratorResponse {
            success: false,
            tool_used,
            extracted_parameters: to_map(extraction),
            tool_response: Map::new(),
            message: CLARIFICATION_MESSAGE.to_string(),
            needs_clarification: true,
            clarification_questions: questions.clone(),
        },
        PipelineOutcome::NoToolNeeded { extraction } => OrchestratorResponse {
            success: true,
            tool_used,
            extracted_parameters: to_map(extraction),
            tool_response: to_map(&json!({ "message": NO_TOOL_PAYLOAD })),
            message: NO_TOOL_MESSAGE.to_string(),
            needs_clarification: false,
            clarification_questions: Vec::new(),
        },
        PipelineOutcome::ToolSuccess {
            extraction,
            response,
        } => OrchestratorResponse {
            success: true,
            tool_used,
            extracted_parameters: to_map(extraction),
            tool_response: to_map(response),
            message: success_message(response),
            needs_clarification: false,
            clarification_questions: Vec::new(),
        },
    }
}
