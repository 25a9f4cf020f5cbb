//! Backend client error types.

use thiserror::Error;

/// Errors that can occur when talking to the rizz backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// `detail` string from the error body, or the raw body.
        message: String,
    },

    /// Backend answered 2xx with `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Failed to parse a backend response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The backend returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}

impl ClientError {
    /// Human-readable message supplied by the backend, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Rejected(message) if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_prefers_non_blank_text() {
        let rejected = ClientError::Rejected("Bad password".into());
        assert_eq!(rejected.backend_message(), Some("Bad password"));

        let blank = ClientError::Rejected("  ".into());
        assert_eq!(blank.backend_message(), None);

        let api = ClientError::Api {
            status: 401,
            message: "Invalid or expired session token.".into(),
        };
        assert_eq!(
            api.backend_message(),
            Some("Invalid or expired session token.")
        );

        assert_eq!(ClientError::Parse("eof".into()).backend_message(), None);
    }
}
