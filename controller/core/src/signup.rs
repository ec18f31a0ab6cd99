//! Mock signup
//!
//! Validates the form, then writes a small JSON record to a key-value
//! store. There is no account server and no read path: the record exists
//! so a later session could tell that someone signed up on this device.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store key for the signup record
pub const USER_KEY: &str = "ecobin_user";

/// Country prefix added to the mobile number
pub const COUNTRY_PREFIX: &str = "+91";

/// Errors from a key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not read or write the backing file
    #[error("store I/O failed at {path}: {source}")]
    Io {
        /// Backing file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Backing file is not a JSON object of strings
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        /// Backing file
        path: PathBuf,
        /// Parse error
        source: serde_json::Error,
    },

    /// In-memory store lock was poisoned
    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors from signup
#[derive(Debug, Error)]
pub enum SignupError {
    /// Password and confirmation differ
    #[error("Passwords do not match!")]
    PasswordMismatch,

    /// Record could not be serialized
    #[error("could not encode signup record: {0}")]
    Encode(#[from] serde_json::Error),

    /// Record could not be stored
    #[error("could not save signup record: {0}")]
    Store(#[from] StoreError),
}

/// String key-value persistence, the shape of browser local storage
///
/// Calls run on the controller task, so implementations must not block.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store that forgets everything on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    guard: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Store at `path` (created on first write)
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: tokio::sync::Mutex::new(()),
        }
    }

    /// `$XDG_DATA_HOME/ecobin/storage.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("ecobin").join("storage.json"))
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.guard.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(&entries).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))
    }
}

/// Submitted signup form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    /// Mobile number without country prefix
    pub mobile: String,
    /// Password
    pub password: String,
    /// Password confirmation
    pub confirm_password: String,
}

/// What gets stored
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRecord {
    /// Mobile number with country prefix
    pub mobile: String,
    /// When the account was created (RFC 3339)
    #[serde(rename = "signupDate")]
    pub signup_date: String,
}

impl SignupRecord {
    /// Record for `mobile` created at `at`
    #[must_use]
    pub fn new(mobile: &str, at: DateTime<Utc>) -> Self {
        Self {
            mobile: format!("{COUNTRY_PREFIX}{mobile}"),
            signup_date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Welcome notification text
    #[must_use]
    pub fn welcome(&self) -> String {
        format!("Welcome! Account created for {} 🎉", self.mobile)
    }
}

/// Validate and store a signup
///
/// # Errors
///
/// [`SignupError::PasswordMismatch`] leaves the store untouched. Encoding or
/// storage failures are returned after the record was built.
pub async fn register(
    form: &SignupForm,
    store: &dyn KeyValueStore,
    now: DateTime<Utc>,
) -> Result<SignupRecord, SignupError> {
    if form.password != form.confirm_password {
        return Err(SignupError::PasswordMismatch);
    }
    let record = SignupRecord::new(&form.mobile, now);
    let json = serde_json::to_string(&record)?;
    store.set(USER_KEY, &json).await?;
    tracing::info!(mobile = %record.mobile, "Signup stored");
    Ok(record)
}
