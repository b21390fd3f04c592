//! Typed tool parameters produced by extraction, with their range checks.

use std::fmt;

use serde::{Deserialize, Serialize};
use tutor_common::{Error, Result};

/// The educational tool an extraction selects. Drives all downstream branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    NoteMaker,
    FlashcardGenerator,
    ConceptExplainer,
    #[serde(rename = "none")]
    NoTool,
}

impl ToolKind {
    /// Wire name, also reported as `tool_used` in responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::NoteMaker => "note_maker",
            ToolKind::FlashcardGenerator => "flashcard_generator",
            ToolKind::ConceptExplainer => "concept_explainer",
            ToolKind::NoTool => "none",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStyle {
    Outline,
    BulletPoints,
    Narrative,
    Structured,
}

impl NoteStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteStyle::Outline => "outline",
            NoteStyle::BulletPoints => "bullet_points",
            NoteStyle::Narrative => "narrative",
            NoteStyle::Structured => "structured",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn for_mastery(level: u32) -> Self {
        match level {
            0..=3 => Difficulty::Easy,
            4..=6 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationDepth {
    Basic,
    Intermediate,
    Advanced,
    Comprehensive,
}

impl ExplanationDepth {
    pub fn as_str(self) -> &'static str {
        match self {
            ExplanationDepth::Basic => "basic",
            ExplanationDepth::Intermediate => "intermediate",
            ExplanationDepth::Advanced => "advanced",
            ExplanationDepth::Comprehensive => "comprehensive",
        }
    }

    pub fn for_mastery(level: u32) -> Self {
        match level {
            0..=3 => ExplanationDepth::Basic,
            4..=6 => ExplanationDepth::Intermediate,
            _ => ExplanationDepth::Advanced,
        }
    }
}

/// Number of flashcards to generate, always within 1–20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FlashcardCount(u32);

impl FlashcardCount {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 20;
    pub const DEFAULT: FlashcardCount = FlashcardCount(5);

    pub fn new(count: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(Error::Validation(format!(
                "flashcard count must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                count
            )))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for FlashcardCount {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FlashcardCount> for u32 {
    fn from(count: FlashcardCount) -> u32 {
        count.0
    }
}

fn default_true() -> bool {
    true
}

/// Structured parameters pulled out of a student's message.
///
/// Produced by extraction, completed by [`crate::validate_and_fill`], and
/// read-only for routing and response assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub tool_needed: ToolKind,
    pub confidence: f64,

    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub note_taking_style: Option<NoteStyle>,
    #[serde(default = "default_true")]
    pub include_examples: bool,
    #[serde(default)]
    pub include_analogies: bool,

    #[serde(default)]
    pub flashcard_count: Option<FlashcardCount>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    #[serde(default)]
    pub concept_to_explain: Option<String>,
    #[serde(default)]
    pub desired_depth: Option<ExplanationDepth>,

    pub reasoning: String,
    #[serde(default)]
    pub missing_parameters: Vec<String>,
}

impl ExtractionResult {
    /// An empty result for `tool`, with every optional field unset.
    pub fn new(tool_needed: ToolKind, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            tool_needed,
            confidence,
            topic: None,
            subject: None,
            note_taking_style: None,
            include_examples: true,
            include_analogies: false,
            flashcard_count: None,
            difficulty: None,
            concept_to_explain: None,
            desired_depth: None,
            reasoning: reasoning.into(),
            missing_parameters: Vec::new(),
        }
    }

    /// The safe record used whenever extraction cannot produce a usable result.
    pub fn fallback(reasoning: impl Into<String>) -> Self {
        Self {
            missing_parameters: vec!["all".to_string()],
            ..Self::new(ToolKind::NoTool, 0.0, reasoning)
        }
    }

    /// Check constraints serde cannot express on its own.
    pub fn validate(&self) -> Result<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::Validation(format!(
                "confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            )));
        }
        Ok(())
    }

    pub fn needs_clarification(&self) -> bool {
        !self.missing_parameters.is_empty()
    }
}
