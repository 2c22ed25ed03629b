//! Storage backends holding the groups
//!
//! [`GroupStorage`] is the seam to whatever persists the groups. Two
//! backends ship with the crate: [`MemoryStorage`] for a single process
//! and [`JsonFileStorage`], which keeps one JSON file per group.

use crate::app_name::StorageLocation;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Contents of one group, ordered by key so files diff cleanly
pub type GroupData = BTreeMap<String, String>;

/// Persistent key/value storage partitioned into groups.
///
/// Keys in different groups never collide. A value written with `set` must
/// be visible to the next `get` on the same backend.
pub trait GroupStorage: Send + std::fmt::Debug {
    fn get(&mut self, group: &str, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, group: &str, key: &str, value: String) -> Result<(), StoreError>;

    /// Removing an absent key is not an error
    fn remove(&mut self, group: &str, key: &str) -> Result<(), StoreError>;
}

/// Which backend a store plugin should use.
///
/// Deserializes from `{"type": "memory"}` or
/// `{"type": "json", "root": "/path/to/store"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Json { root: StorageLocation },
}

impl StoreBackend {
    pub fn open(&self) -> Box<dyn GroupStorage> {
        match self {
            StoreBackend::Memory => Box::new(MemoryStorage::default()),
            StoreBackend::Json { root } => Box::new(JsonFileStorage::new(root.clone())),
        }
    }
}

/// Groups kept in process memory only
#[derive(Debug, Default)]
pub struct MemoryStorage {
    groups: HashMap<String, GroupData>,
}

impl GroupStorage for MemoryStorage {
    fn get(&mut self, group: &str, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .groups
            .get(group)
            .and_then(|data| data.get(key))
            .cloned())
    }

    fn set(&mut self, group: &str, key: &str, value: String) -> Result<(), StoreError> {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, group: &str, key: &str) -> Result<(), StoreError> {
        if let Some(data) = self.groups.get_mut(group) {
            data.remove(key);
        }
        Ok(())
    }
}

/// One pretty-printed JSON object per group under a [`StorageLocation`].
///
/// Nothing is cached. Every call reads the group file, and every mutation
/// loads, modifies and rewrites it, so writes made through the standalone
/// helpers are never lost or shadowed.
#[derive(Debug)]
pub struct JsonFileStorage {
    location: StorageLocation,
}

impl JsonFileStorage {
    pub fn new(location: StorageLocation) -> Self {
        Self { location }
    }

    fn load(&self, group: &str) -> Result<GroupData, StoreError> {
        let path = self.location.group_path(group)?;
        let data = load_group_file(&path)?;
        tracing::debug!(group, path = %path.display(), entries = data.len(), "Loaded group");
        Ok(data)
    }

    /// Load a group, apply `modifier`, and save it back if it reports a change
    fn modify<F>(&self, group: &str, modifier: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut GroupData) -> bool,
    {
        let path = self.location.group_path(group)?;
        let mut data = load_group_file(&path)?;
        let modified = modifier(&mut data);
        if modified {
            save_group_file(&path, &data)?;
        }
        Ok(modified)
    }
}

impl GroupStorage for JsonFileStorage {
    fn get(&mut self, group: &str, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load(group)?.remove(key))
    }

    fn set(&mut self, group: &str, key: &str, value: String) -> Result<(), StoreError> {
        self.modify(group, |data| {
            data.insert(key.to_string(), value);
            true
        })?;
        Ok(())
    }

    fn remove(&mut self, group: &str, key: &str) -> Result<(), StoreError> {
        self.modify(group, |data| data.remove(key).is_some())?;
        Ok(())
    }
}

/// Read a group file. Missing and empty files are empty groups.
pub(crate) fn load_group_file(path: &Path) -> Result<GroupData, StoreError> {
    if !path.exists() {
        return Ok(GroupData::new());
    }
    let contents = fs::read_to_string(path)?;
    parse_group(&contents)
}

pub(crate) fn parse_group(contents: &str) -> Result<GroupData, StoreError> {
    if contents.trim().is_empty() {
        return Ok(GroupData::new());
    }
    Ok(serde_json::from_str(contents)?)
}

/// Write a group file, creating the storage root if needed
pub(crate) fn save_group_file(path: &Path, data: &GroupData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(data)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn memory_groups_are_isolated() {
        let mut storage = MemoryStorage::default();
        storage.set("a", "k", "in a".into()).unwrap();

        assert_eq!(storage.get("a", "k").unwrap(), Some("in a".to_string()));
        assert_eq!(storage.get("b", "k").unwrap(), None);
    }

    #[test]
    fn json_storage_writes_through() {
        let dir = tempdir().unwrap();
        let location = StorageLocation::at(dir.path());
        let mut storage = JsonFileStorage::new(location.clone());

        storage.set("group.example", "widgetText", "Hello".into()).unwrap();
        storage.set("group.example", "count", "3".into()).unwrap();

        let raw = fs::read_to_string(location.group_path("group.example").unwrap()).unwrap();
        let on_disk: GroupData = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            on_disk.into_iter().collect::<Vec<_>>(),
            vec![
                ("count".to_string(), "3".to_string()),
                ("widgetText".to_string(), "Hello".to_string()),
            ]
        );

        let mut reopened = JsonFileStorage::new(location);
        assert_eq!(
            reopened.get("group.example", "widgetText").unwrap(),
            Some("Hello".to_string())
        );
    }

    #[test]
    fn json_remove_of_absent_key_does_not_create_a_file() {
        let dir = tempdir().unwrap();
        let location = StorageLocation::at(dir.path());
        let mut storage = JsonFileStorage::new(location.clone());

        storage.remove("untouched", "nothing").unwrap();
        assert!(!location.group_path("untouched").unwrap().exists());
    }

    #[test]
    fn empty_and_missing_files_read_as_empty_groups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();

        assert!(load_group_file(&path).unwrap().is_empty());
        assert!(load_group_file(&dir.path().join("absent.json")).unwrap().is_empty());
    }

    #[test]
    fn corrupt_group_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let location = StorageLocation::at(dir.path());
        fs::write(location.group_path("broken").unwrap(), "{ not json").unwrap();

        let mut storage = JsonFileStorage::new(location);
        assert!(matches!(storage.get("broken", "k"), Err(StoreError::Parse(_))));
    }

    #[test]
    fn json_storage_keeps_values_written_behind_its_back() {
        let dir = tempdir().unwrap();
        let location = StorageLocation::at(dir.path());
        let mut storage = JsonFileStorage::new(location.clone());
        assert_eq!(storage.get("g", "a").unwrap(), None);

        let path = location.group_path("g").unwrap();
        let outside = GroupData::from([("b".to_string(), "from-widget".to_string())]);
        save_group_file(&path, &outside).unwrap();
        assert_eq!(storage.get("g", "b").unwrap(), Some("from-widget".to_string()));

        storage.set("g", "a", "1".into()).unwrap();
        let on_disk = load_group_file(&path).unwrap();
        assert_eq!(on_disk.get("a"), Some(&"1".to_string()));
        assert_eq!(on_disk.get("b"), Some(&"from-widget".to_string()));
    }

    #[test]
    fn failed_write_is_not_visible_to_later_reads() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("not-a-directory");
        fs::write(&root, "").unwrap();
        let mut storage = JsonFileStorage::new(StorageLocation::at(&root));

        assert!(matches!(
            storage.set("g", "k", "v".into()),
            Err(StoreError::Io(_))
        ));
        assert_eq!(storage.get("g", "k").unwrap(), None);
    }

    #[test]
    fn backend_config_deserializes() {
        let backend: StoreBackend =
            serde_json::from_str(r#"{ "type": "json", "root": "/var/lib/bridge" }"#).unwrap();
        assert_eq!(
            backend,
            StoreBackend::Json {
                root: StorageLocation::at("/var/lib/bridge")
            }
        );

        let backend: StoreBackend = serde_json::from_str(r#"{ "type": "memory" }"#).unwrap();
        assert_eq!(backend, StoreBackend::Memory);
    }
}
