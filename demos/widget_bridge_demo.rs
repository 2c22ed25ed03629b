//! Replays a typical UI script against the bridge
//!
//! Registers a widget surface, stores text for it, refreshes it, reads the
//! text back and removes it again. The widget provider re-reads the group
//! file through the standalone helpers, the way a home-screen widget would.
//!
//! Run with:
//!
//! ```text
//! cargo run --example widget_bridge_demo
//! ```

use serde_json::json;
use std::sync::Arc;
use widget_bridge::{PluginCall, PluginManager};
use widget_bridge_store::{AppName, StorageLocation, StorePlugin, read_value_or};
use widget_bridge_widgets::{LocalWidgetHost, SurfaceCatalog, WidgetHost, WidgetId, WidgetsPlugin};

const GROUP: &str = "group.de.kisimedia.WidgetBridgeExample";
const KEY: &str = "widgetText";
const WIDGET: &str = "com.example.plugin.MyAppWidget";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let app_name = AppName::new("de", "kisimedia", "WidgetBridgeExample");
    let location = StorageLocation::for_app(&app_name);
    let runtime = Arc::new(
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?,
    );

    // The widget side: redraw with whatever text the app stored
    let provider_location = location.clone();
    let provider_runtime = Arc::clone(&runtime);
    let catalog = SurfaceCatalog::builder()
        .register(WIDGET, move |ids: &[WidgetId]| {
            let text = provider_runtime.block_on(read_value_or(
                &provider_location,
                GROUP,
                KEY,
                "No text set",
            ));
            for id in ids {
                println!("   [widget {}] {}", id.0, text);
            }
        })
        .build();

    let host = Arc::new(LocalWidgetHost::new());
    host.add_instance(WIDGET);

    let mut bridge = PluginManager::new();
    bridge.install(StorePlugin::for_app(&app_name));
    bridge.install(WidgetsPlugin::new(
        Arc::clone(&host) as Arc<dyn WidgetHost>,
        catalog,
    ));

    println!("=== Widget Bridge Demo ===\n");
    println!("Storage root: {}\n", location.root().display());

    println!("1. Registering widget surfaces...");
    let response = bridge.call(
        &PluginCall::new("setRegisteredWidgets").arg("widgets", json!([WIDGET])),
    )?;
    println!("   {}\n", response);

    println!("2. Saving text and reloading all timelines...");
    bridge.call(
        &PluginCall::new("setItem")
            .arg("key", KEY)
            .arg("group", GROUP)
            .arg("value", "Hello from the bridge"),
    )?;
    bridge.call(&PluginCall::new("reloadAllTimelines"))?;
    println!();

    println!("3. Reading the text back...");
    let response = bridge.call(&PluginCall::new("getItem").arg("key", KEY).arg("group", GROUP))?;
    println!("   {}\n", response);

    println!("4. Asking the user to pin another widget...");
    let response = bridge.call(&PluginCall::new("requestWidget"))?;
    println!("   {}\n", response);

    println!("5. Removing the text and reloading...");
    bridge.call(&PluginCall::new("removeItem").arg("key", KEY).arg("group", GROUP))?;
    bridge.call(&PluginCall::new("reloadTimelines").arg("ofKind", WIDGET))?;
    println!();

    println!("6. Reloading an unknown surface...");
    match bridge.call(&PluginCall::new("reloadTimelines").arg("ofKind", "a.b.C")) {
        Ok(response) => println!("   unexpected: {}", response),
        Err(e) => println!("   rejected ({}): {}\n", e.code(), e),
    }

    println!("Broadcasts delivered: {}", host.broadcasts().len());
    println!("=== Demo Complete ===");

    Ok(())
}
