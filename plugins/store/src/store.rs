//! Validated get/set/remove over a storage backend

use crate::storage::GroupStorage;
use widget_bridge::{BridgeError, BridgeResult};

/// Namespaced string store.
///
/// Groups and keys must be non-empty, and so must values written with
/// [`set`](Self::set). Arguments are checked before the backend is touched.
#[derive(Debug)]
pub struct NamespacedStore {
    storage: Box<dyn GroupStorage>,
}

impl NamespacedStore {
    pub fn new(storage: Box<dyn GroupStorage>) -> Self {
        Self { storage }
    }

    /// Value stored under `(group, key)`, or `None` when absent
    pub fn get(&mut self, group: &str, key: &str) -> BridgeResult<Option<String>> {
        require_group_and_key(group, key)?;
        Ok(self.storage.get(group, key)?)
    }

    /// Store `value` under `(group, key)`, replacing any previous value
    pub fn set(&mut self, group: &str, key: &str, value: &str) -> BridgeResult<()> {
        if group.is_empty() || key.is_empty() || value.is_empty() {
            return Err(BridgeError::invalid_argument("Missing key, group, or value"));
        }
        self.storage.set(group, key, value.to_string())?;
        tracing::debug!(group, key, "Stored value");
        Ok(())
    }

    /// Drop `(group, key)`. Absent keys are fine.
    pub fn remove(&mut self, group: &str, key: &str) -> BridgeResult<()> {
        require_group_and_key(group, key)?;
        self.storage.remove(group, key)?;
        tracing::debug!(group, key, "Removed value");
        Ok(())
    }
}

fn require_group_and_key(group: &str, key: &str) -> BridgeResult<()> {
    if group.is_empty() || key.is_empty() {
        return Err(BridgeError::invalid_argument("Missing key or group"));
    }
    Ok(())
}
