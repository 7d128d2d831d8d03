//! Storage error types
//!
//! This module defines the errors that can occur inside the store adapters,
//! and their mapping onto the kernel's `PortError`.

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data directory could not be created or opened
    #[error("Failed to open data directory {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading a value failed
    #[error("Failed to read key '{key}': {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing a value failed
    #[error("Failed to write key '{key}': {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped to a storage location
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Unknown backend name in configuration
    #[error("Unknown store backend: {0}")]
    UnknownBackend(String),
}

impl StoreError {
    /// Checks if this error is caused by the caller rather than the medium
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, StoreError::InvalidKey(_) | StoreError::UnknownBackend(_))
    }
}

impl From<StoreError> for PortError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidKey(key) => PortError::InvalidKey(key),
            other => {
                let message = other.to_string();
                PortError::storage_with_source(message, other)
            }
        }
    }
}
