//! Cross-cutting error types for rizz.
//!
//! Domain-specific errors (`AuthError`, `DirectoryError`, ...) live in their
//! respective crates. The CLI converges all of them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any rizz crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity} from {from} to {to}")]
    InvalidTransition {
        entity: String,
        from: String,
        to: String,
    },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Shorthand for an [`CoreError::InvalidTransition`] between two displayable states.
    pub fn transition(
        entity: &str,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidTransition {
            entity: entity.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
