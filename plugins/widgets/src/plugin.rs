//! Bridge plugin exposing the refresh dispatcher

use crate::config::WidgetsConfig;
use crate::dispatcher::RefreshDispatcher;
use crate::host::WidgetHost;
use crate::messages::{WidgetsInput, WidgetsOutput};
use crate::registry::SurfaceRegistry;
use crate::surface::SurfaceCatalog;
use std::fmt;
use std::sync::Arc;
use widget_bridge::{BridgeResult, Plugin, PluginCall};

/// Bridge plugin answering the widget refresh methods
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use widget_bridge::PluginManager;
/// use widget_bridge_widgets::{LocalWidgetHost, SurfaceCatalog, WidgetsPlugin};
///
/// let catalog = SurfaceCatalog::builder()
///     .register_kind("com.example.MyAppWidget")
///     .build();
///
/// let mut bridge = PluginManager::new();
/// bridge.install(WidgetsPlugin::new(Arc::new(LocalWidgetHost::new()), catalog));
/// ```
#[derive(Clone)]
pub struct WidgetsPlugin {
    host: Arc<dyn WidgetHost>,
    catalog: SurfaceCatalog,
    config: WidgetsConfig,
}

impl fmt::Debug for WidgetsPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetsPlugin")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WidgetsPlugin {
    pub const METHODS: &'static [&'static str] = &[
        "reloadAllTimelines",
        "reloadTimelines",
        "setRegisteredWidgets",
        "getCurrentConfigurations",
        "requestWidget",
    ];

    pub fn new(host: Arc<dyn WidgetHost>, catalog: SurfaceCatalog) -> Self {
        Self {
            host,
            catalog,
            config: WidgetsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: WidgetsConfig) -> Self {
        self.config = config;
        self
    }
}

impl Plugin for WidgetsPlugin {
    type Input = WidgetsInput;
    type State = RefreshDispatcher;
    type Output = WidgetsOutput;

    fn name(&self) -> &'static str {
        "widgets"
    }

    fn methods(&self) -> &'static [&'static str] {
        Self::METHODS
    }

    /// Every launch starts with an empty registry
    fn init(&self) -> Self::State {
        RefreshDispatcher::new(
            Arc::clone(&self.host),
            self.catalog.clone(),
            SurfaceRegistry::default(),
            self.config.clone(),
        )
    }

    fn parse(&self, call: &PluginCall) -> BridgeResult<Self::Input> {
        WidgetsInput::from_call(call)
    }

    fn update(&self, state: &mut Self::State, input: Self::Input) -> BridgeResult<Self::Output> {
        match input {
            WidgetsInput::ReloadAllTimelines => {
                state.reload_all_timelines();
                Ok(WidgetsOutput::Done(true))
            }
            WidgetsInput::ReloadTimelines { kind } => {
                state.reload_timelines(&kind)?;
                Ok(WidgetsOutput::Done(true))
            }
            WidgetsInput::SetRegisteredWidgets(descriptors) => {
                state.set_registered_widgets(descriptors);
                Ok(WidgetsOutput::Done(true))
            }
            WidgetsInput::GetCurrentConfigurations => {
                Ok(WidgetsOutput::Marker(state.current_configurations()))
            }
            WidgetsInput::RequestWidget => {
                state.request_widget()?;
                Ok(WidgetsOutput::Done(true))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LocalWidgetHost;
    use crate::surface::SurfaceDescriptor;
    use serde_json::json;
    use widget_bridge::{BridgeError, PluginManager};

    fn bridge(host: &Arc<LocalWidgetHost>) -> PluginManager {
        let catalog = SurfaceCatalog::builder()
            .register_kind("com.example.MyAppWidget")
            .build();
        let mut bridge = PluginManager::new();
        bridge.install(WidgetsPlugin::new(Arc::clone(host) as Arc<dyn WidgetHost>, catalog));
        bridge
    }

    #[test]
    fn mixed_widget_list_registers_strings_in_order() {
        let host = Arc::new(LocalWidgetHost::new());
        let mut bridge = bridge(&host);

        let call = PluginCall::new("setRegisteredWidgets").arg("widgets", json!(["x", 42, "y"]));
        assert_eq!(bridge.call(&call).unwrap(), json!({ "results": true }));

        let registered = bridge
            .get_plugin_state::<WidgetsPlugin>()
            .unwrap()
            .registry()
            .descriptors()
            .to_vec();
        assert_eq!(registered, vec![SurfaceDescriptor::from("x"), SurfaceDescriptor::from("y")]);
    }

    #[test]
    fn current_configurations_is_a_marker() {
        let host = Arc::new(LocalWidgetHost::new());
        let mut bridge = bridge(&host);

        let response = bridge.call(&PluginCall::new("getCurrentConfigurations")).unwrap();
        assert_eq!(response, json!({ "results": "not supported" }));
    }

    #[test]
    fn unresolvable_registration_still_reloads() {
        let host = Arc::new(LocalWidgetHost::new());
        let mut bridge = bridge(&host);

        bridge
            .call(&PluginCall::new("setRegisteredWidgets").arg("widgets", json!(["a.b.C"])))
            .unwrap();

        assert_eq!(
            bridge.call(&PluginCall::new("reloadAllTimelines")).unwrap(),
            json!({ "results": true })
        );
        assert_eq!(
            bridge
                .call(&PluginCall::new("reloadTimelines").arg("ofKind", "a.b.C"))
                .unwrap_err(),
            BridgeError::not_found("Widget surface not found: a.b.C")
        );
    }

    #[test]
    fn invalid_registration_keeps_previous_set() {
        let host = Arc::new(LocalWidgetHost::new());
        let mut bridge = bridge(&host);
        bridge
            .call(
                &PluginCall::new("setRegisteredWidgets")
                    .arg("widgets", json!(["com.example.MyAppWidget"])),
            )
            .unwrap();

        let err = bridge
            .call(&PluginCall::new("setRegisteredWidgets"))
            .unwrap_err();
        assert_eq!(err, BridgeError::invalid_argument("Missing widgets array"));
        assert_eq!(
            bridge.get_plugin_state::<WidgetsPlugin>().unwrap().registry().len(),
            1
        );
    }
}
