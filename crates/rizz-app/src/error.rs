use rizz_auth::AuthError;
use rizz_core::{CoreError, Screen};
use rizz_directory::DirectoryError;
use rizz_analysis::SendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error(transparent)]
    Navigation(#[from] CoreError),

    /// The intent is only valid on another screen.
    #[error("not available on the {actual} screen (requires {expected})")]
    WrongScreen { expected: Screen, actual: Screen },

    #[error("no contact selected")]
    NoSelection,

    #[error("no analysis result yet")]
    NoResult,
}
