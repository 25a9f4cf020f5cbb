//! Session persistence for the CLI.
//!
//! Load priority: `RIZZ_SESSION__TOKEN` env → OS keyring → file
//! (`~/.rizz/session`). The keyring and the file hold the session as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use rizz_core::Session;

use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "rizz-cli";
const KEYRING_USER: &str = "session";
const SESSION_FILE_NAME: &str = "session";
const TOKEN_ENV: &str = "RIZZ_SESSION__TOKEN";
const USERNAME_ENV: &str = "RIZZ_SESSION__USERNAME";

/// Where a loaded session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Env,
    Keyring,
    File,
}

impl SessionSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Keyring => "keyring",
            Self::File => "file",
        }
    }
}

/// Returns the keyring service name.
///
/// Defaults to `"rizz-cli"`. Override via `RIZZ_KEYRING_SERVICE` for testing.
fn keyring_service() -> String {
    std::env::var("RIZZ_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Persist a session in the OS keychain. Falls back to file if the keyring is
/// unavailable or does not read the value back.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if both keyring and file storage fail.
pub fn store(session: &Session) -> Result<(), AuthError> {
    let json = serde_json::to_string(session)
        .map_err(|e| AuthError::TokenStoreError(format!("serialize session: {e}")))?;

    match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        Ok(entry) => match entry.set_password(&json) {
            Ok(()) if read_keyring().as_deref() == Some(json.as_str()) => Ok(()),
            Ok(()) => {
                tracing::warn!("keyring did not persist the session; falling back to file");
                store_file(&session_path()?, &json)
            }
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                store_file(&session_path()?, &json)
            }
        },
        Err(error) => {
            tracing::warn!(%error, "keyring unavailable; falling back to file");
            store_file(&session_path()?, &json)
        }
    }
}

/// Load the persisted session, if any.
#[must_use]
pub fn load() -> Option<(Session, SessionSource)> {
    if let Ok(token) = std::env::var(TOKEN_ENV)
        && !token.is_empty()
    {
        let username = std::env::var(USERNAME_ENV).unwrap_or_default();
        return Some((Session::new(token, username), SessionSource::Env));
    }

    if let Some(session) = read_keyring().and_then(|json| parse(&json)) {
        return Some((session, SessionSource::Keyring));
    }

    let path = session_path().ok()?;
    load_file(&path).map(|session| (session, SessionSource::File))
}

/// Delete the persisted session from keyring and file.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the session file cannot be removed.
pub fn delete() -> Result<(), AuthError> {
    // Missing keyring entries are fine.
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        let _ = entry.delete_credential();
    }
    delete_file(&session_path()?)
}

// --- Private helpers ---

fn read_keyring() -> Option<String> {
    keyring::Entry::new(&keyring_service(), KEYRING_USER)
        .ok()?
        .get_password()
        .ok()
        .filter(|s| !s.is_empty())
}

fn parse(json: &str) -> Option<Session> {
    match serde_json::from_str::<Session>(json) {
        Ok(session) if !session.token().is_empty() => Some(session),
        Ok(_) => None,
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable persisted session");
            None
        }
    }
}

fn session_path() -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|h| h.join(".rizz").join(SESSION_FILE_NAME))
        .ok_or_else(|| {
            AuthError::TokenStoreError("home directory not found, cannot store session".into())
        })
}

fn store_file(path: &Path, json: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, json)
        .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::TokenStoreError(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

fn load_file(path: &Path) -> Option<Session> {
    fs::read_to_string(path)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .and_then(|json| parse(&json))
}

fn delete_file(path: &Path) -> Result<(), AuthError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            AuthError::TokenStoreError(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_path_is_under_home() {
        let path = session_path().expect("should resolve");
        assert!(path.ends_with(".rizz/session"));
    }

    #[test]
    fn file_store_load_delete_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("nested").join("session");
        let session = Session::new("tok-abc123", "operator");
        let json = serde_json::to_string(&session).expect("json");

        store_file(&path, &json).expect("store");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path)
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777;
            assert_eq!(mode, 0o600, "session file should be 0600");
        }

        let loaded = load_file(&path).expect("load");
        assert_eq!(loaded, session);

        delete_file(&path).expect("delete");
        assert!(!path.exists());
        delete_file(&path).expect("deleting twice is fine");
    }

    #[test]
    fn load_file_ignores_blank_and_garbage() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("session");

        fs::write(&path, "   \n  ").expect("write");
        assert!(load_file(&path).is_none(), "whitespace-only should return None");

        fs::write(&path, "not json").expect("write");
        assert!(load_file(&path).is_none());
    }

    #[test]
    fn parse_rejects_empty_token() {
        let json = serde_json::to_string(&Session::new("", "operator")).unwrap();
        assert!(parse(&json).is_none());
    }

    #[test]
    fn source_labels() {
        assert_eq!(SessionSource::Env.as_str(), "env");
        assert_eq!(SessionSource::Keyring.as_str(), "keyring");
        assert_eq!(SessionSource::File.as_str(), "file");
    }
}
