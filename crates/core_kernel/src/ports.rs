//! Ports and Adapters Infrastructure
//!
//! The ledgers never talk to a storage engine directly. They depend on the
//! [`KeyValueStore`] port defined here, and adapters in `infra_store` (or test
//! doubles) implement it.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        Ledgers (domain_loans, domain_pnl)     │
//! └──────────────────────────────────────────────┘
//!                        │ load / save / remove
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │              KeyValueStore port               │
//! └──────────────────────────────────────────────┘
//!              ▲                       ▲
//!     ┌────────┴────────┐     ┌────────┴────────┐
//!     │  InMemoryStore  │     │  JsonFileStore  │
//!     └─────────────────┘     └─────────────────┘
//! ```
//!
//! Values are opaque bytes; by convention every value is a JSON document and
//! [`KeyValueStoreExt`] provides the typed helpers.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for port operations
///
/// Provides a unified error type that all store adapters must use.
#[derive(Debug, Error)]
pub enum PortError {
    /// The underlying storage could not be reached or written
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored value could not be encoded or decoded
    #[error("Serialization error for key {key}: {message}")]
    Serialization {
        key: String,
        message: String,
    },

    /// The key is not acceptable for this adapter
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl PortError {
    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        PortError::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Storage error carrying its cause
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a Serialization error
    pub fn serialization(key: impl Into<String>, message: impl ToString) -> Self {
        PortError::Serialization {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if the stored bytes were unreadable rather than unreachable
    pub fn is_corrupt_value(&self) -> bool {
        matches!(self, PortError::Serialization { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Asynchronous string-keyed blob store
///
/// Mirrors the capabilities of a device-local key-value store: a missing key
/// reads as `None`, writes replace the whole value, and removal of absent keys
/// is not an error.
#[async_trait]
pub trait KeyValueStore: DomainPort + HealthCheckable {
    /// Reads the value stored under `key`
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PortError>;

    /// Replaces the value stored under `key`
    async fn save(&self, key: &str, value: Vec<u8>) -> Result<(), PortError>;

    /// Removes all given keys
    async fn remove(&self, keys: &[&str]) -> Result<(), PortError>;
}

/// Typed JSON helpers on top of [`KeyValueStore`]
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads and decodes the JSON value under `key`
    async fn load_json<T>(&self, key: &str) -> Result<Option<T>, PortError>
    where
        T: DeserializeOwned + Send,
    {
        match self.load(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| PortError::serialization(key, e)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it under `key`
    async fn save_json<T>(&self, key: &str, value: &T) -> Result<(), PortError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let bytes = serde_json::to_vec(value).map_err(|e| PortError::serialization(key, e))?;
        self.save(key, bytes).await
    }
}

// Blanket implementation for all KeyValueStore implementors
impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is degraded but operational
    Degraded,
    /// Adapter is unhealthy and not operational
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for adapters that support health checks
#[async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
