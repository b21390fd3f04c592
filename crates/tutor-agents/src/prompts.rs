use tutor_common::{ConversationTurn, LearnerProfile, recent_turns};

use crate::params::{Difficulty, ExplanationDepth};

pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are the parameter extraction system of an AI tutor orchestrator.
Analyze the student's message and decide:
1. Which educational tool is needed, if any.
2. Which parameters can be taken from the conversation.
3. Which required information is missing and needs clarification.

AVAILABLE TOOLS:
- note_maker: creates structured study notes on a topic
- flashcard_generator: creates practice flashcards
- concept_explainer: explains a specific concept in detail
- none: no tool needed (greetings, general chat, off-topic)

TOOL SELECTION:
- "I need notes on...", "help me summarize...", "organize what I know" -> note_maker
- "I need practice", "quiz me", "flashcards", "practice problems" -> flashcard_generator
- "What is...", "explain...", "I don't understand..." -> concept_explainer
- greetings, small talk, off-topic -> none

PARAMETER INFERENCE:
- topic/subject: take them from the message or the recent history.
- difficulty: mastery 1-3 or struggling -> easy; 4-6 or neutral -> medium; 7-10 or confident -> hard.
- flashcard_count: 5 unless the student asks for a number (1-20).
- note_taking_style: outline unless the student asks for another style.
- desired_depth: "what is X" -> basic; "explain X" -> intermediate; "deep dive" -> advanced or comprehensive.
- If the learning style mentions "visual", set include_examples and include_analogies to true.
- List every required field you cannot determine in missing_parameters
  using these names: topic, subject, difficulty, count.

OUTPUT SCHEMA (respond with a single JSON object and nothing else):
{
  "tool_needed": "note_maker" | "flashcard_generator" | "concept_explainer" | "none",
  "confidence": number between 0.0 and 1.0,
  "topic": string or null,
  "subject": string or null,
  "note_taking_style": "outline" | "bullet_points" | "narrative" | "structured" | null,
  "include_examples": boolean,
  "include_analogies": boolean,
  "flashcard_count": integer 1-20 or null,
  "difficulty": "easy" | "medium" | "hard" | null,
  "concept_to_explain": string or null,
  "desired_depth": "basic" | "intermediate" | "advanced" | "comprehensive" | null,
  "reasoning": string,
  "missing_parameters": [string]
}"#;

/// Advisory signals derived from the profile and handed to the model.
///
/// These are hints only; hard defaults are applied after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalizationHints {
    pub mastery_level: u32,
    pub suggested_difficulty: Difficulty,
    pub suggested_depth: ExplanationDepth,
    pub visual_learner: bool,
    pub struggling: bool,
    pub confident: bool,
}

impl PersonalizationHints {
    pub fn from_profile(profile: &LearnerProfile) -> Self {
        let mastery_level = profile.mastery_level();
        let struggling = profile.is_struggling();
        let suggested_difficulty = if struggling {
            Difficulty::Easy
        } else {
            Difficulty::for_mastery(mastery_level)
        };

        Self {
            mastery_level,
            suggested_difficulty,
            suggested_depth: ExplanationDepth::for_mastery(mastery_level),
            visual_learner: profile.is_visual_learner(),
            struggling,
            confident: profile.is_confident(),
        }
    }
}

/// Compose the per-request context sent alongside [`EXTRACTION_SYSTEM_PROMPT`].
pub fn build_extraction_prompt(
    message: &str,
    profile: &LearnerProfile,
    history: &[ConversationTurn],
) -> String {
    let hints = PersonalizationHints::from_profile(profile);
    let mut prompt = String::new();

    prompt.push_str("STUDENT PROFILE:\n");
    prompt.push_str(&format!("Name: {}\n", profile.name));
    prompt.push_str(&format!("Grade Level: {}\n", profile.grade_level));
    prompt.push_str(&format!("Learning Style: {}\n", profile.learning_style_summary));
    prompt.push_str(&format!("Emotional State: {}\n", profile.emotional_state_summary));
    prompt.push_str(&format!("Mastery Level: {}\n", profile.mastery_level_summary));

    prompt.push_str("\nPERSONALIZATION HINTS:\n");
    prompt.push_str(&format!("Mastery number: {}\n", hints.mastery_level));
    prompt.push_str(&format!(
        "Suggested difficulty: {}\n",
        hints.suggested_difficulty.as_str()
    ));
    prompt.push_str(&format!("Suggested depth: {}\n", hints.suggested_depth.as_str()));
    if hints.visual_learner {
        prompt.push_str("Visual learner: include examples and analogies\n");
    }
    if hints.struggling {
        prompt.push_str("Student seems to be struggling: prefer easier material\n");
    }
    if hints.confident {
        prompt.push_str("Student seems confident: more challenge is welcome\n");
    }

    prompt.push_str("\nCONVERSATION HISTORY:\n");
    let recent = recent_turns(history);
    if recent.is_empty() {
        prompt.push_str("No previous messages\n");
    } else {
        for turn in recent {
            prompt.push_str(&format!(
                "{}: {}\n",
                turn.role.as_str().to_uppercase(),
                turn.content
            ));
        }
    }

    prompt.push_str("\nCURRENT MESSAGE:\n");
    prompt.push_str(message);
    prompt
}
