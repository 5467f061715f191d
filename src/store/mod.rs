//! Key-value persistence for ledger state.
//!
//! All keys live in a single namespace and values are JSON documents. Writes
//! replace the whole value stored under a key.

pub mod disk;
pub mod memory;

use anyhow::Result;
use serde_json::Value;

pub use disk::DiskStore;
pub use memory::MemoryStore;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
