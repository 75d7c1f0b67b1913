//! Config-version snapshot store.
//!
//! Each node's history lives in one JSON file, `node-{id}.json`, holding its
//! versions oldest first. Writes are atomic (tmp + rename), so readers never
//! see a half-written history.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node {node_id} has no version {version}")]
    NotFound { node_id: u32, version: u32 },
}

/// One stored configuration version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigVersion {
    pub version: u32,
    pub node_id: u32,
    /// Rendered document text.
    pub config: String,
    pub comment: String,
    /// Unix timestamp (seconds).
    pub created_at: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NodeHistory {
    /// Highest version id ever assigned; survives pruning and deletes.
    last_version: u32,
    versions: Vec<ConfigVersion>,
}

pub struct SnapshotStore {
    dir: PathBuf,
    retention: usize,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, retention: usize) -> Self {
        Self {
            dir: dir.into(),
            retention: retention.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn history_path(&self, node_id: u32) -> PathBuf {
        self.dir.join(format!("node-{node_id}.json"))
    }

    /// Read a node's history. Missing or corrupted files are empty history.
    async fn read_history(&self, node_id: u32) -> NodeHistory {
        let path = self.history_path(node_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(history) => history,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupted snapshot file, ignoring");
                    NodeHistory::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => NodeHistory::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read snapshot file");
                NodeHistory::default()
            }
        }
    }

    async fn write_history(&self, node_id: u32, history: &NodeHistory) -> Result<(), SnapshotError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.history_path(node_id);
        let tmp = self.dir.join(format!("node-{node_id}.json.tmp"));
        let data = serde_json::to_string_pretty(history)?;

        tokio::fs::write(&tmp, data.as_bytes()).await?;
        tokio::fs::rename(&tmp, &target).await?;

        debug!(path = %target.display(), versions = history.versions.len(), "snapshot history written");
        Ok(())
    }

    /// Store a new version and prune the oldest beyond the retention count.
    pub async fn save(
        &self,
        node_id: u32,
        config: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<ConfigVersion, SnapshotError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.read_history(node_id).await;

        let version = ConfigVersion {
            version: history.last_version + 1,
            node_id,
            config: config.into(),
            comment: comment.into(),
            created_at: unix_now(),
        };
        history.last_version = version.version;
        history.versions.push(version.clone());

        let excess = history.versions.len().saturating_sub(self.retention);
        if excess > 0 {
            history.versions.drain(..excess);
            debug!(node_id, pruned = excess, "pruned old snapshots");
        }

        self.write_history(node_id, &history).await?;
        info!(node_id, version = version.version, "config snapshot saved");
        Ok(version)
    }

    /// Versions of a node, newest first.
    pub async fn list(&self, node_id: u32) -> Vec<ConfigVersion> {
        let mut versions = self.read_history(node_id).await.versions;
        versions.reverse();
        versions
    }

    pub async fn get(&self, node_id: u32, version: u32) -> Result<ConfigVersion, SnapshotError> {
        self.read_history(node_id)
            .await
            .versions
            .into_iter()
            .find(|v| v.version == version)
            .ok_or(SnapshotError::NotFound { node_id, version })
    }

    pub async fn delete(&self, node_id: u32, version: u32) -> Result<(), SnapshotError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.read_history(node_id).await;

        let before = history.versions.len();
        history.versions.retain(|v| v.version != version);
        if history.versions.len() == before {
            return Err(SnapshotError::NotFound { node_id, version });
        }

        self.write_history(node_id, &history).await?;
        info!(node_id, version, "config snapshot deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), 10);

        store.save(1, "services: []\n", "initial").await.unwrap();
        let second = store.save(1, "metrics: {}\n", "add metrics").await.unwrap();
        assert_eq!(second.version, 2);

        let listed = store.list(1).await;
        let versions: Vec<u32> = listed.iter().map(|v| v.version).collect();
        assert_eq!(versions, vec![2, 1]);
        assert_eq!(listed[0].comment, "add metrics");
        assert!(listed[0].created_at > 0);
        assert!(dir.path().join("node-1.json").exists());
    }

    #[tokio::test]
    async fn retention_prunes_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), 2);
        for i in 0..4 {
            store.save(3, format!("v{i}"), "").await.unwrap();
        }
        let versions: Vec<u32> = store.list(3).await.iter().map(|v| v.version).collect();
        assert_eq!(versions, vec![4, 3]);
        assert!(matches!(
            store.get(3, 1).await,
            Err(SnapshotError::NotFound { node_id: 3, version: 1 })
        ));
    }

    #[tokio::test]
    async fn versions_stay_monotonic_after_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), 5);
        store.save(2, "a", "").await.unwrap();
        store.save(2, "b", "").await.unwrap();
        store.delete(2, 2).await.unwrap();
        let next = store.save(2, "c", "").await.unwrap();
        assert_eq!(next.version, 3);
        assert_eq!(store.get(2, 3).await.unwrap().config, "c");
        assert!(store.delete(2, 2).await.is_err());
    }

    #[tokio::test]
    async fn histories_are_per_node() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), 5);
        store.save(1, "one", "").await.unwrap();
        assert!(store.list(2).await.is_empty());
        assert_eq!(store.save(2, "two", "").await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn corrupted_history_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("node-4.json"), b"not json")
            .await
            .unwrap();
        let store = SnapshotStore::new(dir.path(), 5);
        assert!(store.list(4).await.is_empty());
        assert_eq!(store.save(4, "fresh", "").await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn missing_dir_is_created_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested/snapshots"), 5);
        assert!(store.list(1).await.is_empty());
        store.save(1, "x", "").await.unwrap();
        assert_eq!(store.list(1).await.len(), 1);
    }
}
