use rizz_client::Backend;
use rizz_core::Session;

use crate::{error::AuthError, store::SessionStore};

/// Message shown when the backend rejects a login without saying why.
pub const FALLBACK_LOGIN_MESSAGE: &str = "Login failed";

/// Exchange credentials for a session and make it current.
///
/// Blank credentials are rejected before any request. On failure the store is
/// left untouched.
///
/// # Errors
///
/// - [`AuthError::EmptyCredential`] for a blank username or password.
/// - [`AuthError::LoginRejected`] carrying the backend's message, or
///   [`FALLBACK_LOGIN_MESSAGE`] when it gave none.
pub async fn authenticate(
    backend: &dyn Backend,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::EmptyCredential { field: "username" });
    }
    if password.is_empty() {
        return Err(AuthError::EmptyCredential { field: "password" });
    }

    match backend.login(username, password).await {
        Ok(token) => {
            let session = Session::new(token, username);
            store.set(session.clone());
            tracing::debug!(username, "session established");
            Ok(session)
        }
        Err(error) => {
            tracing::warn!(%error, username, "login failed");
            let message = error
                .backend_message()
                .unwrap_or(FALLBACK_LOGIN_MESSAGE)
                .to_string();
            Err(AuthError::LoginRejected(message))
        }
    }
}
