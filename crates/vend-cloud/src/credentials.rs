//! # Credential Store
//!
//! Persists the last successful login so the terminal can re-authenticate
//! silently on startup. One small JSON file:
//!
//! ```json
//! { "token": "...", "user": { "id": "...", "username": "..." } }
//! ```
//!
//! Deleted on logout. A corrupt file is treated as "not logged in" rather
//! than blocking startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::UserProfile;
use crate::error::CloudResult;

/// The persisted credential payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// File-backed credential storage.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads stored credentials, if any.
    ///
    /// Missing file means "not logged in". An unreadable or corrupt file is
    /// logged and also treated as "not logged in".
    pub fn load(&self) -> Option<StoredCredentials> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "Could not read credential file");
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(creds) => {
                debug!(path = %self.path.display(), "Loaded stored credentials");
                Some(creds)
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "Credential file is corrupt, ignoring");
                None
            }
        }
    }

    /// Saves credentials after a successful login.
    pub fn save(&self, credentials: &StoredCredentials) -> CloudResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, data)?;
        debug!(path = %self.path.display(), "Saved credentials");
        Ok(())
    }

    /// Deletes the credential file (logout). Missing file is fine.
    pub fn clear(&self) -> CloudResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared credentials");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> CredentialStore {
        let path = std::env::temp_dir()
            .join(format!("vend-cred-test-{}.json", uuid::Uuid::new_v4()));
        CredentialStore::new(path)
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let store = temp_store();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let store = temp_store();

        let creds = StoredCredentials {
            token: "tok-123".to_string(),
            user: Some(UserProfile {
                username: Some("aliya".to_string()),
                ..Default::default()
            }),
        };
        store.save(&creds).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.user.unwrap().username.as_deref(), Some("aliya"));

        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing twice is not an error
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let store = temp_store();
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().is_none());
        store.clear().unwrap();
    }
}
