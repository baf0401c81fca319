//! Durable client-side key-value storage.
//!
//! The browser equivalent is `localStorage`: string keys, string values,
//! synchronous access. Two backends are provided:
//!
//! - [`FileStorage`] - one JSON file per key under a directory
//! - [`MemoryStorage`] - process-local map, used in tests and as a fallback

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when accessing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be mapped onto the backing medium.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The backing medium is not available at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A synchronous string key-value store.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
