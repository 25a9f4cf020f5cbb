use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated backend session.
///
/// The bearer token is opaque and never appears in `Debug` output.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    token: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            issued_at: Utc::now(),
        }
    }

    /// Bearer token attached to every backend call.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
