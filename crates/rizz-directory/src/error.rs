use rizz_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A backend call behind a listing, search, or thread resolution failed.
    #[error("{operation} failed: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    /// `resolve_or_create_thread` was called with no participants.
    #[error("at least one participant id is required")]
    NoParticipants,
}

impl DirectoryError {
    pub(crate) fn backend(operation: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Backend { operation, source }
    }

    /// Backend-provided message, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend { source, .. } => source.backend_message(),
            Self::NoParticipants => None,
        }
    }
}
