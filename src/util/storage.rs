//! Durable bearer-token storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store writes tokens here on login and clears them on logout;
//! the API client reads the access token on every authenticated request.
//! Storage is a process-wide shared resource with last-writer-wins
//! semantics: there is no locking across processes and no versioning.

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::net::types::TokenPair;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("token storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// On-disk shape. Key names match the browser `localStorage` entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl From<&TokenPair> for StoredTokens {
    fn from(pair: &TokenPair) -> Self {
        Self { access_token: Some(pair.access.clone()), refresh_token: Some(pair.refresh.clone()) }
    }
}

/// Durable home of the access/refresh token pair.
pub trait TokenStorage: Send + Sync {
    /// Read both tokens. A missing store is `Ok(StoredTokens::default())`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read or decoded.
    fn load(&self) -> Result<StoredTokens, StorageError>;

    /// Persist both tokens, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn save(&self, tokens: &TokenPair) -> Result<(), StorageError>;

    /// Delete both tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be modified.
    fn clear(&self) -> Result<(), StorageError>;

    /// Current access token; unreadable storage counts as "none".
    fn access_token(&self) -> Option<String> {
        match self.load() {
            Ok(tokens) => tokens.access_token,
            Err(e) => {
                tracing::warn!(error = %e, "token storage unreadable; treating as signed out");
                None
            }
        }
    }
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// Token pair kept in a JSON file.
#[derive(Clone, Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoredTokens::default()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(StoredTokens::default());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let raw = serde_json::to_string_pretty(&StoredTokens::from(tokens))?;

        // Readers never observe a partially written file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(|e| self.io_error(e))?;
        restrict_permissions(&tmp).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// In-process storage for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    tokens: Mutex<StoredTokens>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded storage, as if a previous process had logged in.
    #[must_use]
    pub fn with_tokens(tokens: &TokenPair) -> Self {
        Self { tokens: Mutex::new(StoredTokens::from(tokens)) }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        Ok(self.tokens.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = StoredTokens::from(tokens);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = StoredTokens::default();
        Ok(())
    }
}
