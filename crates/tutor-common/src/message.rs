use serde::{Deserialize, Serialize};

use crate::profile::LearnerProfile;

/// Number of most recent turns used as extraction context.
pub const RECENT_TURN_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// The trailing slice of `history` that is relevant for extraction.
pub fn recent_turns(history: &[ConversationTurn]) -> &[ConversationTurn] {
    let start = history.len().saturating_sub(RECENT_TURN_LIMIT);
    &history[start..]
}

/// Inbound body of the orchestrate and validate endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrateRequest {
    pub message: String,
    pub user_info: LearnerProfile,
    #[serde(default)]
    pub chat_history: Vec<ConversationTurn>,
}
