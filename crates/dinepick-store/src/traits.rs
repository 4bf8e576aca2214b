//! Store trait definitions

use crate::StoreResult;

/// Durable string-keyed medium backing every store.
///
/// Values are whole JSON documents. There are no transactions across keys;
/// concurrent writers to the same key race and the last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key`; deleting an absent key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Check if the medium is usable
    fn is_healthy(&self) -> bool;
}
