pub mod error;
pub mod message;
pub mod profile;

pub use error::{Error, Result};
pub use message::{ConversationTurn, OrchestrateRequest, TurnRole, recent_turns};
pub use profile::{DEFAULT_MASTERY_LEVEL, LearnerProfile};
