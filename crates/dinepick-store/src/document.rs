//! JSON document helpers shared by the stores

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{KeyValueStore, StoreResult};

/// Read and decode the document under `key`.
///
/// Missing keys, backend failures and undecodable documents all yield `None`.
pub(crate) fn read_document<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read document, treating as empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Failed to decode document, treating as empty");
            None
        }
    }
}

/// Encode `value` and store it under `key`
pub(crate) fn write_document<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let json = serde_json::to_string(value)?;
    kv.set(key, &json)?;
    debug!(key, bytes = json.len(), "Document written");
    Ok(())
}
