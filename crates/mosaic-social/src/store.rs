//! Durable storage for pool accounts.
//!
//! One store instance backs all accounts of a pool. The pool persists the
//! full account list after every state transition, so a process restart
//! resumes with the same statuses and sessions.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::account::Account;
use crate::error::SocialError;

pub trait AccountStore: Send + Sync {
    /// Loads all persisted accounts. An absent backing file is an empty
    /// pool, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::StoreIo`] / [`SocialError::StoreParse`] when
    /// the backing data exists but cannot be read or decoded.
    fn load(&self) -> Result<Vec<Account>, SocialError>;

    /// Persists the full account list, replacing previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::StoreIo`] when the data cannot be written.
    fn persist(&self, accounts: &[Account]) -> Result<(), SocialError>;
}

/// JSON-file-backed store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AccountStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Account>, SocialError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| SocialError::StoreIo {
                path: self.path.display().to_string(),
                source: e,
            })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self, accounts: &[Account]) -> Result<(), SocialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SocialError::StoreIo {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(accounts)?;
        std::fs::write(&self.path, content).map_err(|e| SocialError::StoreIo {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// In-memory store for tests and ephemeral pools.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the store, e.g. with already-active accounts in tests.
    #[must_use]
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
        }
    }
}

impl AccountStore for MemoryStore {
    fn load(&self) -> Result<Vec<Account>, SocialError> {
        Ok(self
            .accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn persist(&self, accounts: &[Account]) -> Result<(), SocialError> {
        *self
            .accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = accounts.to_vec();
        Ok(())
    }
}
