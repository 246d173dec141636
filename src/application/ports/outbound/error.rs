//! Error types for port operations.

/// Repository operation errors with context for debugging.
///
/// Absence is not an error: lookups return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A stored value could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}
