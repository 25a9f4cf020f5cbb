use std::sync::{Arc, PoisonError, RwLock};

use rizz_core::Session;

use crate::error::AuthError;

/// Holder of the current session.
///
/// Cloning yields another handle to the same slot. At most one session is
/// current; the last `set` wins. Callers read the session when they issue a
/// request and must not hold it across a later suspension point.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current session, or [`AuthError::NotAuthenticated`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] after `clear()` or before any login.
    pub fn require(&self) -> Result<Session, AuthError> {
        self.current().ok_or(AuthError::NotAuthenticated)
    }

    pub fn set(&self, session: Session) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Drop the current session. Returns the session that was removed.
    pub fn clear(&self) -> Option<Session> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
