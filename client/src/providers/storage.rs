//! Durable auth-token storage.
//!
//! One string key: present means a session token, absent means
//! unauthenticated. The storage API is infallible by contract (matching the
//! browser-storage collaborator it stands in for); I/O failures are logged
//! and the in-memory session continues.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Durable client-side token storage.
pub trait TokenStorage: Send + Sync {
    /// Read the stored token, if any.
    fn load(&self) -> Option<String>;

    /// Persist the token.
    fn save(&self, token: &str);

    /// Delete the stored token.
    fn clear(&self);
}

/// File-backed token storage under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Storage at an explicit path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The platform-default token path, when a data directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("worknet").join("token"))
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Option<String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                tracing::warn!(%error, path = %parent.display(), "Could not create token directory");
                return;
            }
        }
        if let Err(error) = std::fs::write(&self.path, token) {
            tracing::warn!(%error, path = %self.path.display(), "Could not persist token");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {},
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {},
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "Could not delete token");
            },
        }
    }
}

/// In-memory token storage (tests, ephemeral sessions).
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    token: Arc<RwLock<Option<String>>>,
}

impl MemoryTokenStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)] // test code

    use super::*;

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryTokenStorage::new();
        assert_eq!(storage.load(), None);

        storage.save("tok");
        assert_eq!(storage.load().as_deref(), Some("tok"));

        storage.clear();
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn file_storage_round_trips() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| panic!("tempdir"));
        let storage = FileTokenStorage::new(dir.path().join("nested").join("token"));

        assert_eq!(storage.load(), None);

        storage.save("tok-on-disk");
        assert_eq!(storage.load().as_deref(), Some("tok-on-disk"));

        storage.clear();
        assert_eq!(storage.load(), None);

        // Clearing an absent token is a no-op
        storage.clear();
    }
}
