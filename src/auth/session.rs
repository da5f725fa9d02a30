use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Session file name inside the app's config directory
const SESSION_FILE: &str = "session.json";

/// On-disk shape of the single credential slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
}

/// Durable backend for the credential slot. Implementations hold at most
/// one token; `clear` on an empty slot is a no-op.
pub trait TokenStorage: Send + Sync {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// File-backed slot shared by every run of the app for this user.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }
}

impl TokenStorage for FileTokenStorage {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        let stored: StoredSession =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(stored.access_token))
    }

    fn write(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&StoredSession {
            access_token: token.to_string(),
        })?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory slot for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl TokenStorage for MemoryTokenStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.token.lock().expect("storage lock poisoned").clone())
    }

    fn write(&self, token: &str) -> Result<()> {
        *self.token.lock().expect("storage lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().expect("storage lock poisoned") = None;
        Ok(())
    }
}

/// Single source of truth for the bearer credential.
///
/// The durable slot is read exactly once, at construction; all later reads
/// are served from the in-memory cache. Writes go through to the backend so
/// the credential survives restarts. A credential written by another
/// concurrently running process is therefore not observed until the next
/// start, matching the one-slot-per-user storage contract.
pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    cached: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        let cached = match storage.read() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session, starting unauthenticated");
                None
            }
        };
        Self {
            storage,
            cached: RwLock::new(cached),
        }
    }

    /// Store a credential. The token is opaque: no shape validation. A
    /// storage failure is logged but the in-memory state still updates, so
    /// the running process stays authenticated for its lifetime.
    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.storage.write(token) {
            warn!(error = %e, "Failed to persist session token");
        }
        *self.cached.write().expect("session lock poisoned") = Some(token.to_string());
    }

    /// Remove the credential. Idempotent.
    pub fn clear(&self) {
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear stored session token");
        }
        *self.cached.write().expect("session lock poisoned") = None;
    }

    pub fn token(&self) -> Option<String> {
        self.cached.read().expect("session lock poisoned").clone()
    }

    /// True iff a non-empty credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.cached
            .read()
            .expect("session lock poisoned")
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn memory_store() -> SessionStore {
        SessionStore::new(Box::new(MemoryTokenStorage::default()))
    }

    fn unique_temp_dir() -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "rentaly-session-test-{}-{}",
            std::process::id(),
            n
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_token_round_trip_in_memory() {
        let store = memory_store();
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());

        store.set_token("tok-abc");
        assert_eq!(store.token().as_deref(), Some("tok-abc"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_token_survives_restart() {
        let dir = unique_temp_dir();

        let store = SessionStore::new(Box::new(FileTokenStorage::new(dir.clone())));
        store.set_token("persisted-token");
        drop(store);

        // A fresh store over the same slot sees the credential
        let store = SessionStore::new(Box::new(FileTokenStorage::new(dir.clone())));
        assert_eq!(store.token().as_deref(), Some("persisted-token"));
        assert!(store.is_authenticated());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = memory_store();
        store.set_token("tok");

        store.clear();
        assert!(!store.is_authenticated());
        store.clear();
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let store = memory_store();
        store.set_token("");
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_relogin_overwrites_credential() {
        let store = memory_store();
        store.set_token("first");
        store.set_token("second");
        assert_eq!(store.token().as_deref(), Some("second"));
    }

    #[test]
    fn test_durable_slot_is_read_once() {
        let dir = unique_temp_dir();

        let store = SessionStore::new(Box::new(FileTokenStorage::new(dir.clone())));
        store.set_token("mine");

        // Another process overwrites the slot behind this store's back
        FileTokenStorage::new(dir.clone()).write("theirs").unwrap();

        // Still serving the cached value until a restart
        assert_eq!(store.token().as_deref(), Some("mine"));

        let restarted = SessionStore::new(Box::new(FileTokenStorage::new(dir.clone())));
        assert_eq!(restarted.token().as_deref(), Some("theirs"));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
