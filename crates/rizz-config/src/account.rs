//! Default account credentials for the CLI.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl AccountConfig {
    /// Check if both credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Return the credentials, or [`ConfigError::NotConfigured`] when either is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for the `account` section.
    pub fn require(&self) -> Result<(&str, &str), ConfigError> {
        if self.is_configured() {
            Ok((&self.username, &self.password))
        } else {
            Err(ConfigError::NotConfigured {
                section: "account",
            })
        }
    }
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!AccountConfig::default().is_configured());
    }

    #[test]
    fn not_configured_when_missing_password() {
        let config = AccountConfig {
            username: "operator".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
        assert!(matches!(
            config.require(),
            Err(ConfigError::NotConfigured { section }) if section == "account"
        ));
    }

    #[test]
    fn debug_hides_password() {
        let config = AccountConfig {
            username: "operator".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
