//! Per-user API token storage.
//!
//! One TOML file per username under the data directory, written after each
//! successful authentication and read at the start of the next run.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ConfigError;

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    username: String,
    token: String,
    ttl: String,
    saved_at: DateTime<Utc>,
}

/// Directory of saved tokens, one file per user.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform data directory (`$XDG_DATA_HOME/csalt/tokens` on Linux).
    pub fn default_location() -> Self {
        Self::new(crate::token_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `username`'s token. Characters outside
    /// `[A-Za-z0-9._-]` are replaced so any username maps to one file name.
    pub fn path_for(&self, username: &str) -> PathBuf {
        let name: String = username
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.toml"))
    }

    /// Read `username`'s saved token. `Ok(None)` when nothing is saved.
    pub fn read(&self, username: &str) -> Result<Option<SecretString>, ConfigError> {
        let path = self.path_for(username);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved token");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let stored: StoredToken =
            toml::from_str(&contents).map_err(|source| ConfigError::TokenFormat {
                path: path.display().to_string(),
                source,
            })?;

        if stored.username != username {
            debug!(
                path = %path.display(),
                stored = %stored.username,
                "token belongs to a different user, ignoring"
            );
            return Ok(None);
        }

        debug!(ttl = %stored.ttl, saved_at = %stored.saved_at, "loaded saved token");
        Ok(Some(SecretString::from(stored.token)))
    }

    /// Save `username`'s token, replacing any previous one.
    pub fn save(&self, username: &str, token: &SecretString, ttl: &str) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.dir)?;

        let stored = StoredToken {
            username: username.to_owned(),
            token: token.expose_secret().to_owned(),
            ttl: ttl.to_owned(),
            saved_at: Utc::now(),
        };
        let body = toml::to_string_pretty(&stored)?;

        let path = self.path_for(username);
        let mut file = open_private(&path)?;
        file.write_all(body.as_bytes())?;
        debug!(path = %path.display(), "saved token");
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::File::create(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens"));

        store
            .save("alice", &SecretString::from("JWT abc".to_owned()), "long")
            .unwrap();

        let token = store.read("alice").unwrap().unwrap();
        assert_eq!(token.expose_secret(), "JWT abc");
    }

    #[test]
    fn missing_token_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        assert!(store.read("nobody").unwrap().is_none());
    }

    #[test]
    fn corrupt_token_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        std::fs::write(store.path_for("alice"), "not = [valid").unwrap();
        assert!(matches!(
            store.read("alice"),
            Err(ConfigError::TokenFormat { .. })
        ));
    }

    #[test]
    fn usernames_are_sanitised() {
        let store = TokenStore::new("/tmp/t");
        assert_eq!(
            store.path_for("a.b@example/../x"),
            PathBuf::from("/tmp/t/a.b_example_.._x.toml")
        );
    }

    #[test]
    fn token_for_other_user_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store
            .save("a@b", &SecretString::from("JWT 1".to_owned()), "long")
            .unwrap();
        // "a_b" sanitises to the same file but is a different user.
        assert!(store.read("a_b").unwrap().is_none());
        assert!(store.read("a@b").unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store
            .save("alice", &SecretString::from("JWT abc".to_owned()), "long")
            .unwrap();
        let mode = std::fs::metadata(store.path_for("alice"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
