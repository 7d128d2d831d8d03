//! Store selection and configuration
//!
//! This module decides which adapter backs the ledgers and opens it.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use core_kernel::KeyValueStore;
use serde::Deserialize;
use tracing::info;

use crate::error::StoreError;
use crate::file::JsonFileStore;
use crate::memory::InMemoryStore;

/// Which adapter backs the key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Values live only for the lifetime of the process
    Memory,
    /// One JSON file per key under the data directory
    File,
}

impl FromStr for StoreBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            other => Err(StoreError::UnknownBackend(other.to_string())),
        }
    }
}

/// Configuration options for the key-value store
///
/// # Example
///
/// ```rust
/// use infra_store::{StoreBackend, StoreConfig};
///
/// let config = StoreConfig::file("./data").backend(StoreBackend::Memory);
/// assert_eq!(config.backend, StoreBackend::Memory);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Selected adapter
    pub backend: StoreBackend,
    /// Directory holding one file per key (file backend only)
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Creates a file-backed configuration rooted at `data_dir`
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::File,
            data_dir: data_dir.into(),
        }
    }

    /// Creates an in-memory configuration
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    /// Sets the backend
    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the data directory
    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file("./data")
    }
}

/// Opens the store described by `config`
///
/// # Errors
///
/// Returns `StoreError::OpenFailed` if the data directory cannot be created
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Opening in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::File => {
            info!(data_dir = %config.data_dir.display(), "Opening JSON file store");
            let store = JsonFileStore::open(&config.data_dir).await?;
            Ok(Arc::new(store))
        }
    }
}
