use super::KeyValueStore;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Store backed by one fjall partition, the partition name being the namespace.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path, namespace: &str) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        let partition = keyspace
            .open_partition(namespace, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open partition: {namespace}"))?;
        debug!("Opened store {} at {}", namespace, path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn flush(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist keyspace")
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.partition.get(key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Corrupt value stored under key: {key}"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let bytes = serde_json::to_vec(&value)?;
        self.partition.insert(key, bytes)?;
        debug!("Store SET for key: {}", key);
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.partition.remove(key)?;
        debug!("Store REMOVE for key: {}", key);
        self.flush()
    }
}
