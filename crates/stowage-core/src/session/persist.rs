// ── Durable session persistence ──
//
// The bearer token and the current-user snapshot survive process
// restarts so an existing session resumes without a fresh login.
// Persistence failures are never fatal to the session itself -- the
// caller logs and carries on.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::User;

/// What gets persisted on a successful login: the bearer token and a
/// serialized snapshot of the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub token: String,
    pub user: User,
}

/// Durable storage for the session credential, owned by the embedding
/// application and injected into [`Registry`](crate::Registry).
pub trait CredentialStore: Send + Sync {
    /// The persisted session, if one exists and parses.
    fn load(&self) -> Option<PersistedSession>;

    /// Persist a session, replacing any previous one.
    fn store(&self, session: &PersistedSession) -> io::Result<()>;

    /// Remove the persisted session (logout or failed login).
    fn clear(&self) -> io::Result<()>;
}

/// File-backed store: one JSON file under the platform config dir.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under the platform config directory
    /// (e.g. `~/.config/stowage/session.json`).
    pub fn default_location() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("org", "stowage", "stowage")?;
        Some(Self::at(dirs.config_dir().join("session.json")))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<PersistedSession> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!(error = %e, "persisted session unreadable, ignoring");
                None
            }
        }
    }

    fn store(&self, session: &PersistedSession) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(session).map_err(io::Error::other)?;
        std::fs::write(&self.path, raw)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    session: std::sync::RwLock<Option<PersistedSession>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<PersistedSession> {
        self.session.read().expect("store lock poisoned").clone()
    }

    fn store(&self, session: &PersistedSession) -> io::Result<()> {
        *self.session.write().expect("store lock poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.session.write().expect("store lock poisoned") = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> PersistedSession {
        PersistedSession {
            token: "sesam".into(),
            user: serde_json::from_value(json!({ "id": "u1", "username": "test.hase" }))
                .unwrap(),
        }
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::at(dir.path().join("session.json"));

        assert!(store.load().is_none());
        store.store(&session()).unwrap();
        assert_eq!(store.load().unwrap(), session());

        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn file_store_ignores_corrupt_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::at(path);
        assert!(store.load().is_none());
    }
}
