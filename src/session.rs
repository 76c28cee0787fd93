//! Session token handling.
//!
//! The token is written once by the login flow (`gatedesk session set`) and
//! read back by every other command. Operations never look it up on their
//! own: callers resolve a [`Session`] and pass it in.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::{config_dir, write_private_yaml};
use crate::error::{DeskError, Result};

/// Environment variable that overrides the stored token.
pub const SESSION_ENV: &str = "GATEDESK_SESSION";

/// An authenticated session.
#[derive(Clone)]
pub struct Session {
    token: Arc<SecretString>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(SecretString::from(token.into())),
        }
    }

    /// Resolve the active session: environment first, then the session file.
    pub fn resolve() -> Result<Self> {
        if let Ok(token) = env::var(SESSION_ENV)
            && !token.trim().is_empty()
        {
            return Ok(Session::new(token.trim()));
        }

        SessionStore::open()?.load()?.ok_or(DeskError::NotLoggedIn)
    }

    pub(crate) fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Token with everything but the last four characters masked.
    pub fn masked(&self) -> String {
        let token = self.token();
        let visible: String = token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if token.chars().count() <= 4 {
            "****".to_string()
        } else {
            format!("****{visible}")
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// On-disk storage for the session token (`session.yaml`).
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open() -> Result<Self> {
        Ok(Self::at(config_dir()?.join("session.yaml")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let file: SessionFile = serde_yaml_ng::from_str(&content)?;
        if file.token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Session::new(file.token.trim())))
    }

    pub fn save(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DeskError::Validation("Session token cannot be empty".to_string()));
        }
        let content = serde_yaml_ng::to_string(&SessionFile {
            token: token.to_string(),
        })?;
        write_private_yaml(&self.path, &content)?;
        tracing::info!("session stored at {}", self.path.display());
        Ok(())
    }

    /// Remove the stored token; returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("sk_live_abcdef123456");
        let debug = format!("{session:?}");
        assert!(!debug.contains("abcdef"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_masked_keeps_last_four() {
        assert_eq!(Session::new("sk_live_abcdef123456").masked(), "****3456");
        assert_eq!(Session::new("abc").masked(), "****");
    }

    #[test]
    fn test_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.yaml"));

        assert!(store.load().unwrap().is_none());
        store.save("  tok_123456  ").unwrap();
        let session = store.load().unwrap().unwrap();
        assert_eq!(session.token(), "tok_123456");

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_store_rejects_empty_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.yaml"));
        assert!(matches!(store.save("   "), Err(DeskError::Validation(_))));
        assert!(!store.path().exists());
    }

    #[test]
    #[serial]
    fn test_env_token_wins() {
        unsafe { env::set_var(SESSION_ENV, "  env_token_9876 ") };
        let session = Session::resolve();
        unsafe { env::remove_var(SESSION_ENV) };

        assert_eq!(session.unwrap().token(), "env_token_9876");
    }
}
