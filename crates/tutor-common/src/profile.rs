use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Mastery level assumed when the summary carries no parseable `Level N`.
pub const DEFAULT_MASTERY_LEVEL: u32 = 5;

const STRUGGLE_KEYWORDS: &[&str] = &["struggling", "confused", "anxious", "frustrated"];
const CONFIDENT_KEYWORDS: &[&str] = &["confident", "advanced"];

static MASTERY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Level (\d+)").expect("mastery regex should compile"));

/// Snapshot of a student's profile, supplied with every request.
///
/// Serialized as `user_info` on the wire; every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub user_id: String,
    pub name: String,
    pub grade_level: String,
    pub learning_style_summary: String,
    pub emotional_state_summary: String,
    pub mastery_level_summary: String,
}

impl LearnerProfile {
    /// Numeric mastery level parsed from the first `Level N` in the summary.
    pub fn mastery_level(&self) -> u32 {
        MASTERY_PATTERN
            .captures(&self.mastery_level_summary)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(DEFAULT_MASTERY_LEVEL)
    }

    pub fn is_visual_learner(&self) -> bool {
        self.learning_style_summary
            .to_lowercase()
            .contains("visual")
    }

    /// True when the emotional state suggests the student is having a hard time.
    pub fn is_struggling(&self) -> bool {
        contains_any(&self.emotional_state_summary, STRUGGLE_KEYWORDS)
    }

    pub fn is_confident(&self) -> bool {
        contains_any(&self.emotional_state_summary, CONFIDENT_KEYWORDS)
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    let lowered = haystack.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}
