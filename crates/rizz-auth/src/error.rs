use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated, run `rizz auth login`")]
    NotAuthenticated,

    #[error("{field} must not be empty")]
    EmptyCredential { field: &'static str },

    #[error("{0}")]
    LoginRejected(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),
}
