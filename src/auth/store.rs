//! Durable credential persistence.
//!
//! The store is a small file-per-key layout rooted at one directory: one
//! file each for the access token, the refresh token, and the cached user
//! profile (JSON). It is purely synchronous local I/O with no expiry logic;
//! deciding when tokens are stale is the session manager's job.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::AuthUser;

/// Key for the short-lived bearer token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key for the long-lived refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Key for the JSON-serialized user profile
pub const USER_KEY: &str = "auth_user";

/// Key used by pre-0.2 releases for a single combined token.
/// Recognized only so `clear_all` can remove it; never read back.
const LEGACY_TOKEN_KEY: &str = "jwt_token";

pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Read a value; absent, empty, or unreadable entries all read as `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key))
            .ok()
            .filter(|v| !v.is_empty())
    }

    /// Write a value, creating the store directory on first use.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .context("Failed to create credential store directory")?;
        std::fs::write(self.key_path(key), value)
            .with_context(|| format!("Failed to write credential key '{}'", key))?;
        Ok(())
    }

    /// Remove a value; removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove credential key '{}'", key))?;
        }
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    /// Store a freshly issued token pair.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, access_token)?;
        self.set(REFRESH_TOKEN_KEY, refresh_token)?;
        Ok(())
    }

    /// Rotate only the access token, leaving the refresh token in place.
    pub fn set_access_token(&self, access_token: &str) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, access_token)
    }

    /// Read the cached profile. A corrupt entry is treated as absent so a
    /// damaged local cache can never block re-authentication.
    pub fn user(&self) -> Option<AuthUser> {
        let raw = self.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored user profile is corrupt, treating as absent");
                None
            }
        }
    }

    pub fn set_user(&self, user: &AuthUser) -> Result<()> {
        let contents = serde_json::to_string(user).context("Failed to serialize user profile")?;
        self.set(USER_KEY, &contents)
    }

    /// Remove every credential key, including the legacy single-token key.
    pub fn clear_all(&self) -> Result<()> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)?;
        self.remove(USER_KEY)?;
        self.remove(LEGACY_TOKEN_KEY)?;
        Ok(())
    }

    /// True iff a non-empty access token is persisted.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}
