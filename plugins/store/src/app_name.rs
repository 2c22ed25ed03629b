//! Application identity and the storage root derived from it

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier used to locate the storage root
///
/// # Example
///
/// ```
/// use widget_bridge_store::AppName;
///
/// let app_name = AppName::new("de", "kisimedia", "WidgetBridgeExample");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppName {
    pub qualifier: String,
    pub organization: String,
    pub application: String,
}

impl AppName {
    /// Create a new application name
    ///
    /// * `qualifier` - Typically a reverse domain name (e.g., "com", "org")
    /// * `organization` - Your organization or username
    /// * `application` - The application name
    pub fn new(
        qualifier: impl Into<String>,
        organization: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        Self {
            qualifier: qualifier.into(),
            organization: organization.into(),
            application: application.into(),
        }
    }
}

/// Directory holding one JSON file per storage group.
///
/// Shared by the bridge-side [`JsonFileStorage`](crate::JsonFileStorage)
/// and the standalone helpers, so both sides agree on the layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageLocation {
    root: PathBuf,
}

impl StorageLocation {
    /// Pin the storage root to an explicit directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform config-local directory for the application
    ///
    /// - Linux: `$XDG_CONFIG_HOME/<app>/store` or `~/.config/<app>/store`
    /// - macOS: `~/Library/Application Support/<qualifier>.<org>.<app>/store`
    /// - Windows: `%LOCALAPPDATA%\<org>\<app>\config\store`
    ///
    /// Falls back to `./store` when no home directory can be found.
    pub fn for_app(app_name: &AppName) -> Self {
        let root = directories::ProjectDirs::from(
            &app_name.qualifier,
            &app_name.organization,
            &app_name.application,
        )
        .map(|dirs| dirs.config_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("store");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a group: `<root>/<group>.json`
    ///
    /// Group names that could escape the root are rejected.
    pub fn group_path(&self, group: &str) -> Result<PathBuf, StoreError> {
        let escapes = group.is_empty()
            || group == "."
            || group == ".."
            || group.contains(['/', '\\', '\0']);
        if escapes {
            return Err(StoreError::InvalidGroup(group.to_string()));
        }
        Ok(self.root.join(format!("{}.json", group)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_files_live_under_the_root() {
        let location = StorageLocation::at("/tmp/widgets");
        assert_eq!(
            location.group_path("group.de.kisimedia.Example").unwrap(),
            PathBuf::from("/tmp/widgets/group.de.kisimedia.Example.json")
        );
    }

    #[test]
    fn escaping_group_names_are_rejected() {
        let location = StorageLocation::at("/tmp/widgets");
        for group in ["../etc/passwd", "a/b", "a\\b", "..", ".", ""] {
            assert!(
                matches!(location.group_path(group), Err(StoreError::InvalidGroup(_))),
                "{group} should be rejected"
            );
        }
    }

    #[test]
    fn doubled_dots_inside_a_name_are_allowed() {
        let location = StorageLocation::at("/tmp/widgets");
        assert_eq!(
            location.group_path("com..example").unwrap(),
            PathBuf::from("/tmp/widgets/com..example.json")
        );
    }

    #[test]
    fn app_location_ends_in_store() {
        let location = StorageLocation::for_app(&AppName::new("com", "example", "bridge"));
        assert!(location.root().ends_with("store"));
    }
}
