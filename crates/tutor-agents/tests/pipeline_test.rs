use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tutor_agents::tools::{
    ConceptExplainerRequest, ConceptExplainerResponse, Flashcard, FlashcardRequest,
    FlashcardResponse, NoteMakerRequest, NoteMakerResponse,
};
use tutor_agents::{
    LlmProvider, LlmRequest, LlmResponse, MockToolClient, Orchestrator, ParameterExtractor,
    PipelineOutcome, ToolClient,
};
use tutor_common::{ConversationTurn, Error, LearnerProfile, Result};

/// Returns a fixed completion, or fails when `text` is `None`.
struct ScriptedProvider {
    text: Option<String>,
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse> {
        match &self.text {
            Some(text) => Ok(LlmResponse {
                text: text.clone(),
                model: "scripted".to_string(),
                usage: None,
                stop_reason: Some("stop".to_string()),
            }),
            None => Err(Error::Agent("connection refused".to_string())),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Records requests and answers with a minimal payload, or fails on demand.
#[derive(Default)]
struct RecordingTools {
    fail: bool,
    notes: Mutex<Vec<NoteMakerRequest>>,
    flashcards: Mutex<Vec<FlashcardRequest>>,
    concepts: Mutex<Vec<ConceptExplainerRequest>>,
}

impl RecordingTools {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(Error::Tool("flashcard service unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ToolClient for RecordingTools {
    fn client_id(&self) -> &str {
        "recording"
    }

    async fn create_notes(&self, request: &NoteMakerRequest) -> Result<NoteMakerResponse> {
        self.notes.lock().unwrap().push(request.clone());
        self.check()?;
        Ok(NoteMakerResponse {
            topic: request.topic.clone(),
            title: "Notes".to_string(),
            summary: String::new(),
            note_sections: vec![],
            key_concepts: vec![],
            connections_to_prior_learning: vec![],
            practice_suggestions: vec![],
            source_references: vec![],
            note_taking_style: request.note_taking_style.as_str().to_string(),
        })
    }

    async fn generate_flashcards(&self, request: &FlashcardRequest) -> Result<FlashcardResponse> {
        self.flashcards.lock().unwrap().push(request.clone());
        self.check()?;
        Ok(FlashcardResponse {
            flashcards: (1..=request.count.get())
                .map(|i| Flashcard {
                    title: format!("Card {i}"),
                    question: "Q".to_string(),
                    answer: "A".to_string(),
                    example: None,
                })
                .collect(),
            topic: request.topic.clone(),
            adaptation_details: String::new(),
            difficulty: request.difficulty.as_str().to_string(),
        })
    }

    async fn explain_concept(
        &self,
        request: &ConceptExplainerRequest,
    ) -> Result<ConceptExplainerResponse> {
        self.concepts.lock().unwrap().push(request.clone());
        self.check()?;
        Ok(ConceptExplainerResponse {
            explanation: format!("About {}", request.concept_to_explain),
            examples: vec![],
            related_concepts: vec![],
            visual_aids: vec![],
            practice_questions: vec![],
            source_references: vec![],
        })
    }
}

fn profile(learning_style: &str, mastery: &str) -> LearnerProfile {
    LearnerProfile {
        user_id: "student123".to_string(),
        name: "Alice".to_string(),
        grade_level: "10".to_string(),
        learning_style_summary: learning_style.to_string(),
        emotional_state_summary: "Focused and motivated".to_string(),
        mastery_level_summary: mastery.to_string(),
    }
}

fn orchestrator(llm_output: Option<serde_json::Value>, tools: Arc<dyn ToolClient>) -> Orchestrator {
    let provider = Arc::new(ScriptedProvider {
        text: llm_output.map(|v| v.to_string()),
    });
    let extractor = Arc::new(ParameterExtractor::new(provider, "scripted-model"));
    Orchestrator::new(extractor, tools)
}

#[tokio::test]
async fn greeting_needs_no_tool() {
    let tools = Arc::new(RecordingTools::default());
    let orch = orchestrator(
        Some(json!({
            "tool_needed": "none",
            "confidence": 0.95,
            "reasoning": "Simple greeting"
        })),
        tools.clone(),
    );

    let response = orch
        .orchestrate("Hi there!", &profile("Visual", "Level 5"), &[])
        .await;

    assert!(response.success);
    assert_eq!(response.tool_used, "none");
    assert!(!response.needs_clarification);
    assert_eq!(response.extracted_parameters["tool_needed"], "none");
    assert!(tools.flashcards.lock().unwrap().is_empty());
}

#[tokio::test]
async fn flashcards_fill_count_difficulty_and_subject() {
    let tools = Arc::new(RecordingTools::default());
    let orch = orchestrator(
        Some(json!({
            "tool_needed": "flashcard_generator",
            "confidence": 0.9,
            "topic": "derivatives",
            "reasoning": "Practice request"
        })),
        tools.clone(),
    );

    let response = orch
        .orchestrate(
            "I want to practice derivatives",
            &profile("Kinesthetic", "Level 5"),
            &[],
        )
        .await;

    assert!(response.success);
    assert_eq!(response.tool_used, "flashcard_generator");
    assert_eq!(
        response.message,
        "I've generated **5 flashcards** on derivatives to help you practice!"
    );

    let requests = tools.flashcards.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].subject, "derivatives");
    assert_eq!(requests[0].count.get(), 5);
    assert_eq!(requests[0].difficulty.as_str(), "medium");
}

#[tokio::test]
async fn tool_failure_becomes_error_response() {
    let orch = orchestrator(
        Some(json!({
            "tool_needed": "flashcard_generator",
            "confidence": 0.9,
            "topic": "derivatives",
            "flashcard_count": 3,
            "reasoning": "Practice request"
        })),
        Arc::new(RecordingTools::failing()),
    );

    let response = orch
        .orchestrate("flashcards on derivatives", &profile("Visual", "Level 5"), &[])
        .await;

    assert!(!response.success);
    assert_eq!(response.tool_used, "none");
    assert!(response.message.starts_with("Sorry, something went wrong:"));
    assert!(response.message.contains("Tool execution failed"));
    assert!(response.extracted_parameters.is_empty());
}

#[tokio::test]
async fn missing_parameters_ask_in_order() {
    let tools = Arc::new(RecordingTools::default());
    let orch = orchestrator(
        Some(json!({
            "tool_needed": "flashcard_generator",
            "confidence": 0.4,
            "reasoning": "Vague request",
            "missing_parameters": ["topic", "count"]
        })),
        tools.clone(),
    );

    let response = orch
        .orchestrate("make me some cards", &profile("Visual", "Level 5"), &[])
        .await;

    assert!(!response.success);
    assert!(response.needs_clarification);
    assert_eq!(response.message, "I need a bit more information to help you better.");
    assert_eq!(
        response.clarification_questions,
        vec![
            "What specific topic would you like to focus on?".to_string(),
            "How many flashcards would you like? (1-20)".to_string(),
        ]
    );
    assert!(tools.flashcards.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unparsable_output_asks_generic_question() {
    let provider = Arc::new(ScriptedProvider {
        text: Some("Sorry, I can't help with that.".to_string()),
    });
    let extractor = Arc::new(ParameterExtractor::new(provider, "scripted-model"));
    let orch = Orchestrator::new(extractor, Arc::new(MockToolClient::new()));

    let outcome = orch
        .run("???", &profile("Visual", "Level 5"), &[])
        .await;

    match outcome {
        PipelineOutcome::NeedsClarification {
            extraction,
            questions,
        } => {
            assert_eq!(extraction.confidence, 0.0);
            assert_eq!(extraction.missing_parameters, vec!["all".to_string()]);
            assert_eq!(
                questions,
                vec!["Could you provide more details about what you need?".to_string()]
            );
        }
        other => panic!("expected clarification, got {other:?}"),
    }
}

#[tokio::test]
async fn provider_failure_never_raises() {
    let orch = orchestrator(None, Arc::new(MockToolClient::new()));

    let response = orch
        .orchestrate("explain photosynthesis", &profile("Visual", "Level 5"), &[])
        .await;

    assert!(!response.success);
    assert!(response.needs_clarification);
    assert!(
        response.extracted_parameters["reasoning"]
            .as_str()
            .unwrap()
            .starts_with("Failed to call language model")
    );
}

#[tokio::test]
async fn visual_learner_notes_include_examples_and_analogies() {
    let tools = Arc::new(RecordingTools::default());
    let orch = orchestrator(
        Some(json!({
            "tool_needed": "note_maker",
            "confidence": 0.9,
            "topic": "photosynthesis",
            "subject": "biology",
            "include_examples": false,
            "reasoning": "Notes request"
        })),
        tools.clone(),
    );
    let history = vec![
        ConversationTurn::user("What do plants eat?"),
        ConversationTurn::assistant("They make their own food."),
    ];

    let response = orch
        .orchestrate(
            "Make notes on photosynthesis",
            &profile("Visual learner, prefers diagrams", "Level 6"),
            &history,
        )
        .await;

    assert!(response.success);
    assert_eq!(response.tool_used, "note_maker");
    assert_eq!(
        response.message,
        "I've created structured notes on **photosynthesis** for you! Check out the sections below."
    );

    let requests = tools.notes.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].include_examples);
    assert!(requests[0].include_analogies);
    assert_eq!(requests[0].note_taking_style.as_str(), "structured");
    assert_eq!(requests[0].chat_history.len(), 2);
}

#[tokio::test]
async fn concept_falls_back_to_topic() {
    let tools = Arc::new(RecordingTools::default());
    let orch = orchestrator(
        Some(json!({
            "tool_needed": "concept_explainer",
            "confidence": 0.85,
            "topic": "mitosis",
            "reasoning": "Explanation request"
        })),
        tools.clone(),
    );

    let response = orch
        .orchestrate("what is mitosis?", &profile("Auditory", "Level 2"), &[])
        .await;

    assert!(response.success);
    assert_eq!(response.tool_used, "concept_explainer");

    let requests = tools.concepts.lock().unwrap();
    assert_eq!(requests[0].concept_to_explain, "mitosis");
    assert_eq!(requests[0].current_topic, "mitosis");
    assert_eq!(requests[0].desired_depth.as_str(), "basic");
}

#[tokio::test]
async fn tool_without_topic_fails_without_calling_tool() {
    let tools = Arc::new(RecordingTools::default());
    let orch = orchestrator(
        Some(json!({
            "tool_needed": "flashcard_generator",
            "confidence": 0.7,
            "reasoning": "Practice request"
        })),
        tools.clone(),
    );

    let response = orch
        .orchestrate("flashcards please", &profile("Visual", "Level 8"), &[])
        .await;

    assert!(!response.success);
    assert!(response.message.contains("requires topic"));
    assert!(tools.flashcards.lock().unwrap().is_empty());
}

#[tokio::test]
async fn mock_tools_run_end_to_end() {
    let orch = orchestrator(
        Some(json!({
            "tool_needed": "flashcard_generator",
            "confidence": 0.9,
            "topic": "fractions",
            "flashcard_count": 4,
            "reasoning": "Practice request"
        })),
        Arc::new(MockToolClient::new()),
    );

    let response = orch
        .orchestrate("4 flashcards on fractions", &profile("Visual", "Level 3"), &[])
        .await;

    assert!(response.success);
    assert_eq!(response.tool_response["flashcards"].as_array().unwrap().len(), 4);
    assert_eq!(response.tool_response["difficulty"], "easy");
    assert_eq!(orch.tool_client_id(), "mock");
}
