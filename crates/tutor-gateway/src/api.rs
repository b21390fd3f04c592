use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};
use tracing::info;
use tutor_agents::tools::TOOL_CATALOG;
use tutor_agents::OrchestratorResponse;
use tutor_common::OrchestrateRequest;
use tutor_security::InputValidator;

use crate::error::ApiError;
use crate::state::SharedState;

/// Parse and validate an inbound request. Schema failures are 422,
/// validation failures 400.
fn accept(
    state: &SharedState,
    payload: Result<Json<OrchestrateRequest>, JsonRejection>,
) -> Result<OrchestrateRequest, ApiError> {
    let Json(mut request) = payload?;
    state.validator.validate(&request)?;
    request.message = InputValidator::sanitize(&request.message);
    Ok(request)
}

fn preview(message: &str) -> String {
    message.chars().take(100).collect()
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "tutor-orchestrator",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "orchestrate": "/orchestrate",
            "validate": "/validate",
            "tools": "/tools",
        }
    }))
}

pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "llm_provider": state.orchestrator.extractor().provider_id(),
        "tool_client": state.orchestrator.tool_client_id(),
        "uptime_secs": state.uptime_secs(),
    }))
}

pub async fn list_tools() -> Json<Value> {
    Json(json!({ "tools": TOOL_CATALOG }))
}

pub async fn orchestrate(
    State(state): State<SharedState>,
    payload: Result<Json<OrchestrateRequest>, JsonRejection>,
) -> Result<Json<OrchestratorResponse>, ApiError> {
    let request = accept(&state, payload)?;
    info!(
        user_id = %request.user_info.user_id,
        message = %preview(&request.message),
        "orchestration request received"
    );

    let response = state
        .orchestrator
        .orchestrate(&request.message, &request.user_info, &request.chat_history)
        .await;

    info!(tool_used = %response.tool_used, success = response.success, "orchestration completed");
    Ok(Json(response))
}

/// Extraction and default-filling without calling any tool.
pub async fn validate(
    State(state): State<SharedState>,
    payload: Result<Json<OrchestrateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = accept(&state, payload)?;
    info!(user_id = %request.user_info.user_id, "validation-only request");

    let validated = state
        .orchestrator
        .analyze(&request.message, &request.user_info, &request.chat_history)
        .await;
    if let Some(error) = validated.error {
        return Err(ApiError::Internal(error));
    }

    let extraction = validated.extraction;
    Ok(Json(json!({
        "validation": "success",
        "tool_would_be_called": extraction.tool_needed,
        "confidence": extraction.confidence,
        "reasoning": extraction.reasoning,
        "extracted_parameters": extraction,
    })))
}
