use thiserror::Error;

/// Why a button action did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Caught before dispatch: missing selection, empty or malformed input.
    #[error("{0}")]
    Validation(String),

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response. `message` is the server's `error` field, if any.
    #[error("server returned {status}")]
    Server { status: u16, message: Option<String> },

    /// 2xx response whose body could not be parsed.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ActionError {
    /// Text shown to the user: the server message, or `fallback` when the
    /// server gave none.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ActionError::Validation(msg) => msg.clone(),
            ActionError::Transport(msg) => format!("Network error: {}", msg),
            ActionError::Server { message, .. } => {
                format!("Error: {}", message.as_deref().unwrap_or(fallback))
            }
            ActionError::Decode(_) => format!("Error: {}", fallback),
        }
    }
}
