//! Token persistence
//!
//! The browser build kept the token in localStorage; here the same contract
//! is a `TokenStore` trait with a file-backed implementation under the
//! user's data directory, so the session survives process restarts.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::claims::peek_claims;
use super::Session;
use crate::domain::Role;
use crate::error::Error;

/// Storage backend for the session token. No network calls, no decoding,
/// just persistence.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, `None` when absent or unreadable.
    fn load(&self) -> Option<String>;
    /// Persist the token, overwriting any previous one.
    fn save(&self, token: &str) -> Result<(), Error>;
    /// Remove the stored token (logout).
    fn clear(&self) -> Result<(), Error>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn save(&self, token: &str) -> Result<(), Error> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct SessionFile {
    access_token: String,
}

/// File-backed store. The file holds a single JSON object so other tools
/// can inspect it; a corrupt file reads as no session.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `<data dir>/dhriti-console/session.json`.
    pub fn default_path() -> PathBuf {
        dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dhriti-console")
            .join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<SessionFile>(&raw) {
            Ok(file) => Some(file.access_token),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = SessionFile {
            access_token: token.to_string(),
        };
        let raw = serde_json::to_string_pretty(&file).expect("session file serializes");
        std::fs::write(&self.path, raw)?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The session store the guard and controllers are handed by reference;
/// no view reads ambient storage on its own.
pub struct SessionStore {
    backend: Box<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(backend: Box<dyn TokenStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::<MemoryTokenStore>::default())
    }

    pub fn set_token(&self, token: &str) -> Result<(), Error> {
        self.backend.save(token)
    }

    pub fn token(&self) -> Option<String> {
        self.backend.load()
    }

    /// Role derived from the stored token's claims. Absent when there is no
    /// token or the token no longer decodes.
    pub fn role(&self) -> Option<Role> {
        let token = self.backend.load()?;
        peek_claims(&token)?.role()
    }

    pub fn clear(&self) -> Result<(), Error> {
        self.backend.clear()
    }

    /// Snapshot for a single guard evaluation.
    pub fn snapshot(&self) -> Session {
        let token = self.backend.load();
        let role = token.as_deref().and_then(|t| peek_claims(t)?.role());
        Session { token, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::session::Claims;

    fn signed_token(role: &str) -> String {
        let claims = Claims {
            sub: "user@test.com".to_string(),
            role: Some(role.to_string()),
            exp: Utc::now().timestamp() + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"whatever"),
        )
        .unwrap()
    }

    #[test]
    fn set_get_clear_round_trip() {
        let store = SessionStore::in_memory();
        assert_eq!(store.token(), None);

        store.set_token("abc").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc"));

        store.set_token("def").unwrap();
        assert_eq!(store.token().as_deref(), Some("def"));

        store.clear().unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn role_is_derived_from_token() {
        let store = SessionStore::in_memory();
        assert_eq!(store.role(), None);

        store.set_token(&signed_token("vendor")).unwrap();
        assert_eq!(store.role(), Some(Role::Vendor));

        // Opaque token: stored fine, but no role falls out of it.
        store.set_token("abc").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.role(), None);
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let store = SessionStore::in_memory();
        assert_eq!(store.snapshot(), Session::anonymous());

        let token = signed_token("admin");
        store.set_token(&token).unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.token.as_deref(), Some(token.as_str()));
        assert_eq!(snap.role, Some(Role::Admin));
    }

    #[test]
    fn file_store_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("dhriti-session-test-{}", std::process::id()))
            .join("session.json");
        let store = FileTokenStore::new(&path);
        let _ = store.clear();

        assert_eq!(store.load(), None);
        store.save("abc").unwrap();
        assert_eq!(store.load().as_deref(), Some("abc"));

        // Corrupt file reads as no session instead of erroring.
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(store.load(), None);

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }
}
