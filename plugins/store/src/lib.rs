//! Store Plugin for the widget bridge
//!
//! Namespaced key/value storage for strings. Each storage group is an
//! isolated namespace, so the app and each widget surface can keep their
//! own configuration without key collisions.
//!
//! # Features
//!
//! - `getItem` / `setItem` / `removeItem` bridge methods
//! - In-memory or JSON-file backends, selectable from config
//! - Standalone async helpers for widget providers that read the same groups
//!
//! # Example
//!
//! ```ignore
//! use widget_bridge::{PluginCall, PluginManager};
//! use widget_bridge_store::{AppName, StorePlugin};
//!
//! let mut bridge = PluginManager::new();
//! bridge.install(StorePlugin::for_app(&AppName::new("com", "example", "myapp")));
//!
//! bridge.call(
//!     &PluginCall::new("setItem")
//!         .arg("group", "group.com.example")
//!         .arg("key", "widgetText")
//!         .arg("value", "Hello"),
//! )?;
//! ```

mod app_name;
mod error;
mod helpers;
mod messages;
mod plugin;
mod storage;
mod store;

pub use app_name::{AppName, StorageLocation};
pub use error::StoreError;
pub use helpers::{
    delete_value, has_value, list_keys, read_json, read_value, read_value_or, write_value,
};
pub use messages::{StoreInput, StoreOutput};
pub use plugin::StorePlugin;
pub use storage::{GroupData, GroupStorage, JsonFileStorage, MemoryStorage, StoreBackend};
pub use store::NamespacedStore;
