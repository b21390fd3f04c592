//! Request and response contracts of the educational tool APIs.

use serde::{Deserialize, Serialize};
use tutor_common::{ConversationTurn, Error, LearnerProfile, Result};

use crate::params::{
    Difficulty, ExplanationDepth, ExtractionResult, FlashcardCount, NoteStyle, ToolKind,
};

const GENERAL_SUBJECT: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMakerRequest {
    pub user_info: LearnerProfile,
    pub chat_history: Vec<ConversationTurn>,
    pub topic: String,
    pub subject: String,
    pub note_taking_style: NoteStyle,
    #[serde(default = "default_true")]
    pub include_examples: bool,
    #[serde(default)]
    pub include_analogies: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardRequest {
    pub user_info: LearnerProfile,
    pub topic: String,
    pub count: FlashcardCount,
    pub difficulty: Difficulty,
    pub subject: String,
    #[serde(default = "default_true")]
    pub include_examples: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptExplainerRequest {
    pub user_info: LearnerProfile,
    pub chat_history: Vec<ConversationTurn>,
    pub concept_to_explain: String,
    pub current_topic: String,
    pub desired_depth: ExplanationDepth,
}

fn default_true() -> bool {
    true
}

/// First value that is present and not blank.
fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .find(|s| !s.trim().is_empty())
}

fn unset(tool: ToolKind, field: &str) -> Error {
    Error::Validation(format!("{tool} request requires {field}, which is unset"))
}

impl NoteMakerRequest {
    pub fn from_extraction(
        extraction: &ExtractionResult,
        profile: &LearnerProfile,
        history: &[ConversationTurn],
    ) -> Result<Self> {
        let topic = first_present(&[&extraction.topic])
            .ok_or_else(|| unset(ToolKind::NoteMaker, "topic"))?;
        let subject = first_present(&[&extraction.subject, &extraction.topic])
            .unwrap_or(GENERAL_SUBJECT);
        let note_taking_style = extraction
            .note_taking_style
            .ok_or_else(|| unset(ToolKind::NoteMaker, "note_taking_style"))?;

        Ok(Self {
            user_info: profile.clone(),
            chat_history: history.to_vec(),
            topic: topic.to_string(),
            subject: subject.to_string(),
            note_taking_style,
            include_examples: extraction.include_examples,
            include_analogies: extraction.include_analogies,
        })
    }
}

impl FlashcardRequest {
    pub fn from_extraction(extraction: &ExtractionResult, profile: &LearnerProfile) -> Result<Self> {
        let topic = first_present(&[&extraction.topic])
            .ok_or_else(|| unset(ToolKind::FlashcardGenerator, "topic"))?;
        let subject = first_present(&[&extraction.subject, &extraction.topic])
            .unwrap_or(GENERAL_SUBJECT);
        let count = extraction
            .flashcard_count
            .ok_or_else(|| unset(ToolKind::FlashcardGenerator, "count"))?;
        let difficulty = extraction
            .difficulty
            .ok_or_else(|| unset(ToolKind::FlashcardGenerator, "difficulty"))?;

        Ok(Self {
            user_info: profile.clone(),
            topic: topic.to_string(),
            count,
            difficulty,
            subject: subject.to_string(),
            include_examples: extraction.include_examples,
        })
    }
}

impl ConceptExplainerRequest {
    pub fn from_extraction(
        extraction: &ExtractionResult,
        profile: &LearnerProfile,
        history: &[ConversationTurn],
    ) -> Result<Self> {
        let concept = first_present(&[&extraction.concept_to_explain, &extraction.topic])
            .ok_or_else(|| unset(ToolKind::ConceptExplainer, "concept_to_explain"))?;
        let current_topic = first_present(&[&extraction.subject, &extraction.topic])
            .ok_or_else(|| unset(ToolKind::ConceptExplainer, "current_topic"))?;
        let desired_depth = extraction
            .desired_depth
            .ok_or_else(|| unset(ToolKind::ConceptExplainer, "desired_depth"))?;

        Ok(Self {
            user_info: profile.clone(),
            chat_history: history.to_vec(),
            concept_to_explain: concept.to_string(),
            current_topic: current_topic.to_string(),
            desired_depth,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSection {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub analogies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMakerResponse {
    pub topic: String,
    pub title: String,
    pub summary: String,
    pub note_sections: Vec<NoteSection>,
    pub key_concepts: Vec<String>,
    pub connections_to_prior_learning: Vec<String>,
    pub practice_suggestions: Vec<String>,
    #[serde(default)]
    pub source_references: Vec<String>,
    pub note_taking_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub title: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardResponse {
    pub flashcards: Vec<Flashcard>,
    pub topic: String,
    pub adaptation_details: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptExplainerResponse {
    pub explanation: String,
    pub examples: Vec<String>,
    pub related_concepts: Vec<String>,
    pub visual_aids: Vec<String>,
    pub practice_questions: Vec<String>,
    #[serde(default)]
    pub source_references: Vec<String>,
}
