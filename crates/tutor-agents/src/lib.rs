pub mod extraction;
pub mod openai;
pub mod orchestrator;
pub mod params;
pub mod personalize;
pub mod prompts;
pub mod providers;
pub mod response;
pub mod tools;

pub use extraction::{ParameterExtractor, parse_extraction};
pub use openai::OpenAiProvider;
pub use orchestrator::{Orchestrator, Route, Validated, clarification_questions, route};
pub use params::{Difficulty, ExplanationDepth, ExtractionResult, FlashcardCount, NoteStyle, ToolKind};
pub use personalize::validate_and_fill;
pub use providers::{ChatMessage, ChatRole, LlmProvider, LlmRequest, LlmResponse, Usage};
pub use response::{OrchestratorResponse, PipelineOutcome, assemble};
pub use tools::{HttpToolClient, MockToolClient, ToolClient, ToolResponse};
