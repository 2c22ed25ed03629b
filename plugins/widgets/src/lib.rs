//! Widgets Plugin for the widget bridge
//!
//! Keeps the list of widget surfaces the app manages and asks the platform
//! to redraw them, one kind at a time or all at once. Also starts the
//! platform's "pin a new widget" flow.
//!
//! Surfaces are resolved through a [`SurfaceCatalog`] filled at startup;
//! the platform side is reached through the [`WidgetHost`] trait.
//! [`LocalWidgetHost`] implements it in-process.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use widget_bridge::{PluginCall, PluginManager};
//! use widget_bridge_widgets::{LocalWidgetHost, SurfaceCatalog, WidgetsPlugin};
//!
//! let catalog = SurfaceCatalog::builder()
//!     .register_kind("com.example.MyAppWidget")
//!     .build();
//!
//! let mut bridge = PluginManager::new();
//! bridge.install(WidgetsPlugin::new(Arc::new(LocalWidgetHost::new()), catalog));
//!
//! bridge.call(
//!     &PluginCall::new("setRegisteredWidgets")
//!         .arg("widgets", serde_json::json!(["com.example.MyAppWidget"])),
//! )?;
//! bridge.call(&PluginCall::new("reloadAllTimelines"))?;
//! ```

mod config;
mod dispatcher;
mod host;
mod messages;
mod plugin;
mod registry;
mod surface;

pub use config::{PIN_FLOW_MIN_API_LEVEL, WidgetsConfig};
pub use dispatcher::{
    DescriptorReload, NOT_SUPPORTED, RefreshDispatcher, ReloadError, ReloadOutcome,
};
pub use host::{HostError, LocalWidgetHost, PinCallback, RefreshBroadcast, WidgetHost};
pub use messages::{WidgetsInput, WidgetsOutput};
pub use plugin::WidgetsPlugin;
pub use registry::{RegistryState, SurfaceRegistry};
pub use surface::{
    ResolveError, SurfaceCatalog, SurfaceCatalogBuilder, SurfaceDescriptor, SurfaceType,
    WidgetId, WidgetProvider,
};
