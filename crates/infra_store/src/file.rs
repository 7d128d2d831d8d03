//! JSON file store
//!
//! Every key maps to `<data_dir>/<key>.json`. Writes go to a temporary
//! sibling first and are renamed into place, so a crash mid-write leaves the
//! previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, KeyValueStore, PortError,
};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::StoreError;

/// File-backed implementation of the `KeyValueStore` port
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) a store rooted at `root`
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .map_err(|source| StoreError::OpenFailed {
                path: root.display().to_string(),
                source,
            })?;
        Ok(Self { root })
    }

    /// Directory holding the value files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a key onto its file path
    ///
    /// Keys are restricted to ASCII letters, digits, `_`, `-` and `.` and may
    /// not start with a dot, so a key can never escape the data directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::ReadFailed {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp_path = self
            .root
            .join(format!(".{key}.{}.tmp", uuid::Uuid::new_v4().simple()));

        let write_failed = |source| StoreError::WriteFailed {
            key: key.to_string(),
            source,
        };

        fs::write(&tmp_path, value).await.map_err(write_failed)?;
        if let Err(source) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(write_failed(source));
        }
        debug!(key, bytes = value.len(), "Value written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::WriteFailed {
                key: key.to_string(),
                source,
            }),
        }
    }
}

impl DomainPort for JsonFileStore {}

#[async_trait]
impl HealthCheckable for JsonFileStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let (status, message) = match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => {
                (AdapterHealth::Healthy, None)
            }
            Ok(meta) if meta.is_dir() => (
                AdapterHealth::Degraded,
                Some("Data directory is read-only".to_string()),
            ),
            Ok(_) => (
                AdapterHealth::Unhealthy,
                Some("Data path is not a directory".to_string()),
            ),
            Err(e) => {
                warn!(error = %e, root = %self.root.display(), "Data directory unavailable");
                (AdapterHealth::Unhealthy, Some(e.to_string()))
            }
        };

        HealthCheckResult {
            adapter_id: "json-file-store".to_string(),
            status,
            latency_ms: start.elapsed().as_millis() as u64,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PortError> {
        Ok(self.read(key).await?)
    }

    async fn save(&self, key: &str, value: Vec<u8>) -> Result<(), PortError> {
        Ok(self.write(key, &value).await?)
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), PortError> {
        for key in keys {
            self.delete(key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::KeyValueStoreExt;
    use tempfile::TempDir;

    async fn open_temp() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let (dir, store) = open_temp().await;
        store
            .save_json("loanTracker_loans", &serde_json::json!([{"id": "1"}]))
            .await
            .unwrap();

        let reopened = JsonFileStore::open(dir.path().join("data")).await.unwrap();
        let value: Option<serde_json::Value> =
            reopened.load_json("loanTracker_loans").await.unwrap();
        assert_eq!(value, Some(serde_json::json!([{"id": "1"}])));
    }

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let (_dir, store) = open_temp().await;
        assert!(store.load("pnlTracker_entries_v2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_files() {
        let (_dir, store) = open_temp().await;
        store.save("k", b"1".to_vec()).await.unwrap();
        store.save("k", b"2".to_vec()).await.unwrap();

        assert_eq!(store.load("k").await.unwrap(), Some(b"2".to_vec()));
        let mut names = Vec::new();
        let mut entries = fs::read_dir(store.root()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_ignores_missing_keys() {
        let (_dir, store) = open_temp().await;
        store.save("a", b"1".to_vec()).await.unwrap();
        store.remove(&["a", "b"]).await.unwrap();
        assert_eq!(store.load("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let (_dir, store) = open_temp().await;
        for key in ["", "../escape", ".hidden", "a/b"] {
            let err = store.save(key, b"x".to_vec()).await.unwrap_err();
            assert!(matches!(err, PortError::InvalidKey(_)), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn test_health_check_reports_healthy() {
        let (_dir, store) = open_temp().await;
        let result = store.health_check().await;
        assert_eq!(result.status, AdapterHealth::Healthy);
        assert_eq!(result.adapter_id, "json-file-store");
    }
}
