//! Store doubles
//!
//! [`FailingStore`] refuses every operation; [`ReadOnlyStore`] serves reads
//! from an in-memory store and refuses writes. Both report themselves as
//! unhealthy or degraded so readiness checks can be exercised.
//! [`UnreliableStore`] fails reads of chosen keys on demand and can slow reads
//! down to widen race windows.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, KeyValueStore, PortError,
};
use infra_store::InMemoryStore;

/// A store whose every operation fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl DomainPort for FailingStore {}

#[async_trait]
impl HealthCheckable for FailingStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "failing-store".to_string(),
            status: AdapterHealth::Unhealthy,
            latency_ms: 0,
            message: Some("store unavailable".to_string()),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PortError> {
        Err(PortError::storage(format!("load of {key} refused")))
    }

    async fn save(&self, key: &str, _value: Vec<u8>) -> Result<(), PortError> {
        Err(PortError::storage(format!("save of {key} refused")))
    }

    async fn remove(&self, _keys: &[&str]) -> Result<(), PortError> {
        Err(PortError::storage("remove refused"))
    }
}

/// Reads from a seeded in-memory store, refuses every write
#[derive(Clone, Default)]
pub struct ReadOnlyStore {
    inner: InMemoryStore,
}

impl ReadOnlyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self { inner }
    }
}

impl DomainPort for ReadOnlyStore {}

#[async_trait]
impl HealthCheckable for ReadOnlyStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "read-only-store".to_string(),
            status: AdapterHealth::Degraded,
            latency_ms: 0,
            message: Some("writes disabled".to_string()),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PortError> {
        self.inner.load(key).await
    }

    async fn save(&self, key: &str, _value: Vec<u8>) -> Result<(), PortError> {
        Err(PortError::storage(format!("save of {key} refused")))
    }

    async fn remove(&self, _keys: &[&str]) -> Result<(), PortError> {
        Err(PortError::storage("remove refused"))
    }
}

/// In-memory store with switchable read failures and read latency
#[derive(Default)]
pub struct UnreliableStore {
    inner: InMemoryStore,
    unreadable: Mutex<HashSet<String>>,
    read_delay: Option<Duration>,
}

impl UnreliableStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            unreadable: Mutex::new(HashSet::new()),
            read_delay: None,
        }
    }

    /// Sleeps this long before every read
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Makes reads of `keys` fail with a storage error
    pub fn set_unreadable(&self, keys: &[&str]) {
        let mut unreadable = self.unreadable.lock().unwrap_or_else(|e| e.into_inner());
        unreadable.extend(keys.iter().map(|key| key.to_string()));
    }

    /// Lets every read through again
    pub fn clear_unreadable(&self) {
        self.unreadable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// The wrapped store, for seeding and inspection
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    fn is_unreadable(&self, key: &str) -> bool {
        self.unreadable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }
}

impl DomainPort for UnreliableStore {}

#[async_trait]
impl HealthCheckable for UnreliableStore {
    async fn health_check(&self) -> HealthCheckResult {
        self.inner.health_check().await
    }
}

#[async_trait]
impl KeyValueStore for UnreliableStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PortError> {
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        if self.is_unreadable(key) {
            return Err(PortError::storage(format!("I/O error reading {key}")));
        }
        self.inner.load(key).await
    }

    async fn save(&self, key: &str, value: Vec<u8>) -> Result<(), PortError> {
        self.inner.save(key, value).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), PortError> {
        self.inner.remove(keys).await
    }
}
