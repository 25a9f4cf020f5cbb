use rizz_client::ClientError;
use thiserror::Error;

/// Why a run produced a degraded result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Backend(#[from] ClientError),

    /// 2xx payload carrying `success: false`.
    #[error("analysis rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("no pickup line to send; the analysis produced none")]
    NoPickupLine,

    #[error("send failed: {0}")]
    Backend(#[from] ClientError),
}

impl SendError {
    /// Backend-provided message, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend(error) => error.backend_message(),
            Self::EmptyMessage | Self::NoPickupLine => None,
        }
    }
}
