use tutor_common::{Error, OrchestrateRequest, Result};

/// Upper bound on turns accepted in `chat_history`.
const MAX_HISTORY_TURNS: usize = 100;

/// Transport-level checks applied before a request reaches the pipeline.
#[derive(Debug, Clone)]
pub struct InputValidator {
    max_message_chars: usize,
}

impl InputValidator {
    pub fn new(max_message_chars: usize) -> Self {
        Self { max_message_chars }
    }

    pub fn validate(&self, request: &OrchestrateRequest) -> Result<()> {
        let chars = request.message.chars().count();
        if chars > self.max_message_chars {
            return Err(Error::Validation(format!(
                "message is {chars} characters, limit is {}",
                self.max_message_chars
            )));
        }
        if request.chat_history.len() > MAX_HISTORY_TURNS {
            return Err(Error::Validation(format!(
                "chat_history has {} turns, limit is {MAX_HISTORY_TURNS}",
                request.chat_history.len()
            )));
        }
        if request.user_info.user_id.trim().is_empty() {
            return Err(Error::Validation("user_info.user_id must not be empty".to_string()));
        }
        Ok(())
    }

    /// Strip control characters other than newlines and tabs.
    pub fn sanitize(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
            .collect()
    }
}
