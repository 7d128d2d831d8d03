//! In-memory key-value store
//!
//! Stores values in a map guarded by an async lock. Nothing survives the
//! process; useful for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, KeyValueStore, PortError,
};
use tokio::sync::RwLock;

/// In-memory implementation of the `KeyValueStore` port
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    values: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store with raw values
    pub async fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.values.write().await;
            for (key, value) in values {
                map.insert(key.into(), value);
            }
        }
        store
    }

    /// Returns the stored keys in sorted order
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl DomainPort for InMemoryStore {}

#[async_trait]
impl HealthCheckable for InMemoryStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "memory-store".to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: Some("In-memory store is always available".to_string()),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PortError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Vec<u8>) -> Result<(), PortError> {
        if key.is_empty() {
            return Err(PortError::InvalidKey(key.to_string()));
        }
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), PortError> {
        let mut values = self.values.write().await;
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}
