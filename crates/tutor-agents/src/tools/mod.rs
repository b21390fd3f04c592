pub mod http;
pub mod mock;
pub mod schema;

use async_trait::async_trait;
use serde::Serialize;
use tutor_common::Result;

use crate::params::ToolKind;

pub use http::{HttpToolClient, ToolEndpoints};
pub use mock::MockToolClient;
pub use schema::{
    ConceptExplainerRequest, ConceptExplainerResponse, Flashcard, FlashcardRequest,
    FlashcardResponse, NoteMakerRequest, NoteMakerResponse, NoteSection,
};

/// Client for the three educational tool APIs.
///
/// Shared across concurrent requests, so implementations must be `Sync`.
/// Transport policy (timeouts, retries) lives here, not in the pipeline.
#[async_trait]
pub trait ToolClient: Send + Sync {
    /// Client identifier (e.g. "http", "mock").
    fn client_id(&self) -> &str;

    async fn create_notes(&self, request: &NoteMakerRequest) -> Result<NoteMakerResponse>;

    async fn generate_flashcards(&self, request: &FlashcardRequest) -> Result<FlashcardResponse>;

    async fn explain_concept(
        &self,
        request: &ConceptExplainerRequest,
    ) -> Result<ConceptExplainerResponse>;
}

/// Structured payload returned by whichever tool ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResponse {
    Notes(NoteMakerResponse),
    Flashcards(FlashcardResponse),
    Explanation(ConceptExplainerResponse),
}

impl ToolResponse {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolResponse::Notes(_) => ToolKind::NoteMaker,
            ToolResponse::Flashcards(_) => ToolKind::FlashcardGenerator,
            ToolResponse::Explanation(_) => ToolKind::ConceptExplainer,
        }
    }
}

/// Catalog entry describing one tool and its parameters.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: ToolKind,
    pub description: &'static str,
    pub required_params: &'static [&'static str],
    pub optional_params: &'static [&'static str],
}

pub const TOOL_CATALOG: &[ToolSpec] = &[
    ToolSpec {
        name: ToolKind::NoteMaker,
        description: "Creates structured study notes on a topic",
        required_params: &["topic", "subject", "note_taking_style"],
        optional_params: &["include_examples", "include_analogies"],
    },
    ToolSpec {
        name: ToolKind::FlashcardGenerator,
        description: "Generates practice flashcards",
        required_params: &["topic", "count", "difficulty", "subject"],
        optional_params: &["include_examples"],
    },
    ToolSpec {
        name: ToolKind::ConceptExplainer,
        description: "Explains specific concepts in detail",
        required_params: &["concept_to_explain", "current_topic", "desired_depth"],
        optional_params: &[],
    },
];
