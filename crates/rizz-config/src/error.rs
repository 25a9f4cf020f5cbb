//! Errors raised while loading or validating [`crate::RizzConfig`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the config shape.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// An optional section is needed by the current command but is empty.
    #[error("the [{section}] section is not configured")]
    NotConfigured { section: &'static str },

    /// A field holds a value outside its allowed range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
