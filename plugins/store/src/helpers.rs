//! Standalone helper functions for direct store access
//!
//! Widget providers render in their own storage context and never see the
//! bridge. These functions read and write the same group files as
//! [`JsonFileStorage`](crate::JsonFileStorage), so a provider can pick up
//! what the UI layer stored.

use crate::app_name::StorageLocation;
use crate::error::StoreError;
use crate::storage::{GroupData, parse_group};
use serde::de::DeserializeOwned;
use tokio::fs;

async fn load_group(location: &StorageLocation, group: &str) -> Result<GroupData, StoreError> {
    let path = location.group_path(group)?;
    match fs::read_to_string(&path).await {
        Ok(contents) => parse_group(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(GroupData::new()),
        Err(e) => Err(e.into()),
    }
}

async fn save_group(
    location: &StorageLocation,
    group: &str,
    data: &GroupData,
) -> Result<(), StoreError> {
    let path = location.group_path(group)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let contents = serde_json::to_string_pretty(data)?;
    fs::write(&path, contents).await?;
    Ok(())
}

/// Load a group, apply `modifier`, and save it back if it reports a change
async fn modify_group<F>(
    location: &StorageLocation,
    group: &str,
    modifier: F,
) -> Result<bool, StoreError>
where
    F: FnOnce(&mut GroupData) -> bool,
{
    let mut data = load_group(location, group).await?;
    let modified = modifier(&mut data);
    if modified {
        save_group(location, group, &data).await?;
    }
    Ok(modified)
}

/// Read a stored string, `None` when absent
///
/// # Example
///
/// ```ignore
/// use widget_bridge_store::{StorageLocation, read_value};
///
/// async fn widget_text(location: &StorageLocation) -> Option<String> {
///     read_value(location, "group.com.example", "widgetText").await.ok().flatten()
/// }
/// ```
pub async fn read_value(
    location: &StorageLocation,
    group: &str,
    key: &str,
) -> Result<Option<String>, StoreError> {
    let data = load_group(location, group).await?;
    Ok(data.get(key).cloned())
}

/// Read a stored string, falling back to `default` when absent or unreadable.
///
/// Widgets use this to show placeholder text before anything is stored.
pub async fn read_value_or(
    location: &StorageLocation,
    group: &str,
    key: &str,
    default: &str,
) -> String {
    match read_value(location, group, key).await {
        Ok(Some(value)) => value,
        Ok(None) => default.to_string(),
        Err(e) => {
            tracing::warn!(group, key, error = %e, "Falling back to default value");
            default.to_string()
        }
    }
}

/// Read a stored string and deserialize it as JSON
///
/// # Errors
///
/// Returns an error if the group cannot be loaded, the key is not found, or
/// the value is not valid JSON for `T`.
pub async fn read_json<T>(location: &StorageLocation, group: &str, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned,
{
    let value = read_value(location, group, key)
        .await?
        .ok_or_else(|| StoreError::KeyNotFound {
            group: group.to_string(),
            key: key.to_string(),
        })?;
    Ok(serde_json::from_str(&value)?)
}

/// Store a string, replacing any previous value
pub async fn write_value(
    location: &StorageLocation,
    group: &str,
    key: &str,
    value: &str,
) -> Result<(), StoreError> {
    modify_group(location, group, |data| {
        data.insert(key.to_string(), value.to_string());
        true
    })
    .await?;
    Ok(())
}

/// Delete a value
///
/// Returns `Ok(true)` if the value was deleted, `Ok(false)` if it didn't exist.
pub async fn delete_value(
    location: &StorageLocation,
    group: &str,
    key: &str,
) -> Result<bool, StoreError> {
    modify_group(location, group, |data| data.remove(key).is_some()).await
}

pub async fn has_value(
    location: &StorageLocation,
    group: &str,
    key: &str,
) -> Result<bool, StoreError> {
    let data = load_group(location, group).await?;
    Ok(data.contains_key(key))
}

/// All keys in a group, sorted
pub async fn list_keys(location: &StorageLocation, group: &str) -> Result<Vec<String>, StoreError> {
    let data = load_group(location, group).await?;
    Ok(data.into_keys().collect())
}
