// Typed error taxonomy
//
// Provider failures are classified from the HTTP status and transport
// error class, never by matching substrings of error text. Each kind
// maps to one canned user-facing message so a failed analysis still
// reads gently in the product.

use thiserror::Error;
use uuid::Uuid;

/// Errors from the chat-completions provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API quota exceeded")]
    QuotaExceeded,

    #[error("API key is invalid or missing")]
    InvalidApiKey,

    #[error("model error: {0}")]
    ModelError(String),

    #[error("request timed out")]
    Timeout,

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Whether a retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::ModelError(_) | ProviderError::Timeout | ProviderError::Transport(_)
        )
    }

    /// Canned user-facing message for a failed analysis
    ///
    /// The journal entry is always saved before analysis runs, so every
    /// message can honestly say so.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ProviderError::QuotaExceeded => {
                "Teddy is taking a short break right now. Your entry has been saved, \
                 and you can ask for feedback again in a little while."
            }
            ProviderError::InvalidApiKey => {
                "Teddy couldn't reach its coaching service. Your entry has been saved. \
                 If this keeps happening, please let support know."
            }
            ProviderError::ModelError(_) => {
                "Teddy had trouble putting its thoughts together this time. Your entry \
                 has been saved, and you can try the analysis again."
            }
            ProviderError::Timeout => {
                "Teddy is taking longer than usual to respond. Your entry has been \
                 saved. Please try again in a moment."
            }
            ProviderError::Api { .. } | ProviderError::Transport(_) => {
                "Teddy couldn't offer feedback just now, but your entry has been saved \
                 safely."
            }
        }
    }
}

/// Errors from the embedded journal store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("anxiety level {0} is outside 1-10")]
    InvalidAnxietyLevel(u8),

    #[error("unknown notification channel: {0}")]
    UnknownChannel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_fallback_message() {
        let kinds = [
            ProviderError::QuotaExceeded,
            ProviderError::InvalidApiKey,
            ProviderError::ModelError("boom".to_string()),
            ProviderError::Timeout,
            ProviderError::Api {
                status: 418,
                body: "teapot".to_string(),
            },
        ];

        for kind in kinds {
            let message = kind.fallback_message();
            assert!(message.contains("saved"), "{kind:?} should reassure the user");
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::Timeout.is_retryable());
        assert!(ProviderError::ModelError("overloaded".to_string()).is_retryable());
        assert!(!ProviderError::InvalidApiKey.is_retryable());
        assert!(!ProviderError::QuotaExceeded.is_retryable());
    }
}
