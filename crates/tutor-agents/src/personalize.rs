//! Profile-driven default filling for extraction results.

use tutor_common::LearnerProfile;

use crate::params::{Difficulty, ExplanationDepth, ExtractionResult, FlashcardCount, NoteStyle, ToolKind};

/// Fill unset tool fields from the learner profile.
///
/// Pure and total: `NoTool` results come back untouched, and only the fields
/// named below are ever written.
pub fn validate_and_fill(mut result: ExtractionResult, profile: &LearnerProfile) -> ExtractionResult {
    match result.tool_needed {
        ToolKind::NoTool => {}
        ToolKind::NoteMaker => {
            let visual = profile.is_visual_learner();
            if result.note_taking_style.is_none() {
                result.note_taking_style = Some(if visual {
                    NoteStyle::Structured
                } else {
                    NoteStyle::Outline
                });
            }
            if visual {
                result.include_examples = true;
                result.include_analogies = true;
            }
        }
        ToolKind::FlashcardGenerator => {
            if result.flashcard_count.is_none() {
                result.flashcard_count = Some(FlashcardCount::DEFAULT);
            }
            if result.difficulty.is_none() {
                result.difficulty = Some(Difficulty::for_mastery(profile.mastery_level()));
            }
        }
        ToolKind::ConceptExplainer => {
            if result.desired_depth.is_none() {
                result.desired_depth = Some(ExplanationDepth::for_mastery(profile.mastery_level()));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(style: &str, mastery: &str) -> LearnerProfile {
        LearnerProfile {
            user_id: "s1".to_string(),
            name: "Test Student".to_string(),
            grade_level: "10".to_string(),
            learning_style_summary: style.to_string(),
            emotional_state_summary: "Focused".to_string(),
            mastery_level_summary: mastery.to_string(),
        }
    }

    fn extraction(tool: ToolKind) -> ExtractionResult {
        ExtractionResult::new(tool, 0.8, "test")
    }

    #[test]
    fn no_tool_is_identity() {
        let mut input = extraction(ToolKind::NoTool);
        input.include_examples = false;
        input.missing_parameters = vec!["topic".to_string()];
        let output = validate_and_fill(input.clone(), &profile("Visual learner", "Level 1"));
        assert_eq!(output, input);
    }

    #[test]
    fn visual_learner_gets_structured_notes_with_examples() {
        let mut input = extraction(ToolKind::NoteMaker);
        input.include_examples = false;
        let output = validate_and_fill(input, &profile("Strong VISUAL learner", "Level 5"));
        assert_eq!(output.note_taking_style, Some(NoteStyle::Structured));
        assert!(output.include_examples);
        assert!(output.include_analogies);
    }

    #[test]
    fn visual_learner_keeps_explicit_style() {
        let mut input = extraction(ToolKind::NoteMaker);
        input.note_taking_style = Some(NoteStyle::BulletPoints);
        let output = validate_and_fill(input, &profile("visual", "Level 5"));
        assert_eq!(output.note_taking_style, Some(NoteStyle::BulletPoints));
        assert!(output.include_analogies);
    }

    #[test]
    fn non_visual_notes_default_to_outline() {
        let mut input = extraction(ToolKind::NoteMaker);
        input.include_examples = false;
        let output = validate_and_fill(input, &profile("Kinesthetic learner", "Level 5"));
        assert_eq!(output.note_taking_style, Some(NoteStyle::Outline));
        assert!(!output.include_examples);
        assert!(!output.include_analogies);
    }

    #[test]
    fn flashcard_defaults_follow_mastery() {
        let cases = [
            ("Level 2 - Foundation building", Difficulty::Easy),
            ("Level 3", Difficulty::Easy),
            ("Level 4", Difficulty::Medium),
            ("Level 6 - Competent", Difficulty::Medium),
            ("Level 7 - Proficient", Difficulty::Hard),
            ("Level 10", Difficulty::Hard),
            ("no number here", Difficulty::Medium),
        ];
        for (mastery, expected) in cases {
            let output = validate_and_fill(
                extraction(ToolKind::FlashcardGenerator),
                &profile("Balanced", mastery),
            );
            assert_eq!(output.difficulty, Some(expected), "mastery {mastery:?}");
            assert_eq!(output.flashcard_count, Some(FlashcardCount::DEFAULT));
        }
    }

    #[test]
    fn flashcard_explicit_values_survive() {
        let mut input = extraction(ToolKind::FlashcardGenerator);
        input.flashcard_count = Some(FlashcardCount::new(12).unwrap());
        input.difficulty = Some(Difficulty::Hard);
        let output = validate_and_fill(input, &profile("Balanced", "Level 1"));
        assert_eq!(output.flashcard_count.map(FlashcardCount::get), Some(12));
        assert_eq!(output.difficulty, Some(Difficulty::Hard));
    }

    #[test]
    fn concept_depth_follows_mastery() {
        let low = validate_and_fill(extraction(ToolKind::ConceptExplainer), &profile("", "Level 3"));
        let mid = validate_and_fill(extraction(ToolKind::ConceptExplainer), &profile("", "Level 5"));
        let high = validate_and_fill(extraction(ToolKind::ConceptExplainer), &profile("", "Level 9"));
        assert_eq!(low.desired_depth, Some(ExplanationDepth::Basic));
        assert_eq!(mid.desired_depth, Some(ExplanationDepth::Intermediate));
        assert_eq!(high.desired_depth, Some(ExplanationDepth::Advanced));
    }

    #[test]
    fn other_tools_do_not_touch_note_flags() {
        let mut input = extraction(ToolKind::ConceptExplainer);
        input.include_examples = false;
        let output = validate_and_fill(input, &profile("Visual learner", "Level 5"));
        assert!(!output.include_examples);
        assert!(!output.include_analogies);
        assert!(output.note_taking_style.is_none());
    }
}
