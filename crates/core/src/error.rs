//! Error types for the youthdesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all youthdesk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Request rejected before any side effect (e.g. empty question text).
    /// The message is user-facing and surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum StoreError {
    /// A session carried a guest token that references no stored identity.
    /// Fatal for the request: silently recreating the guest would orphan
    /// their prior history invisibly.
    #[error("Unknown guest token: {0}")]
    UnknownGuest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited by generator, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generator returned an empty completion")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_verbatim() {
        let err = Error::Validation("질문이 없습니다.".into());
        assert_eq!(err.to_string(), "질문이 없습니다.");
    }

    #[test]
    fn sub_errors_convert_into_the_top_level_error() {
        let store: Error = StoreError::Storage("disk full".into()).into();
        assert!(matches!(store, Error::Store(_)));

        let generation: Error = GenerationError::Empty.into();
        assert!(matches!(generation, Error::Generation(_)));
    }

    #[test]
    fn store_error_displays_token() {
        let err = Error::Store(StoreError::UnknownGuest("abc-123".into()));
        assert!(err.to_string().contains("abc-123"));
    }

    #[test]
    fn generation_error_displays_status() {
        let err = Error::Generation(GenerationError::ApiError {
            status_code: 503,
            message: "upstream unavailable".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("upstream unavailable"));
    }
}
