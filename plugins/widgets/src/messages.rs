//! Typed inputs and outputs of the widgets plugin

use crate::registry::SurfaceRegistry;
use crate::surface::SurfaceDescriptor;
use serde::Serialize;
use widget_bridge::{BridgeError, BridgeResult, PluginCall};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetsInput {
    ReloadAllTimelines,
    ReloadTimelines { kind: String },
    SetRegisteredWidgets(Vec<SurfaceDescriptor>),
    GetCurrentConfigurations,
    RequestWidget,
}

impl WidgetsInput {
    pub fn reload_timelines(kind: impl Into<String>) -> Self {
        Self::ReloadTimelines { kind: kind.into() }
    }

    pub fn set_registered_widgets<I, D>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<SurfaceDescriptor>,
    {
        Self::SetRegisteredWidgets(descriptors.into_iter().map(Into::into).collect())
    }

    pub fn from_call(call: &PluginCall) -> BridgeResult<Self> {
        match call.method() {
            "reloadAllTimelines" => Ok(Self::ReloadAllTimelines),
            "reloadTimelines" => call
                .get_non_empty_string("ofKind")
                .map(Self::reload_timelines)
                .ok_or_else(|| BridgeError::invalid_argument("Missing ofKind parameter")),
            "setRegisteredWidgets" => call
                .get_array("widgets")
                .map(|values| {
                    Self::SetRegisteredWidgets(SurfaceRegistry::descriptors_from_values(values))
                })
                .ok_or_else(|| BridgeError::invalid_argument("Missing widgets array")),
            "getCurrentConfigurations" => Ok(Self::GetCurrentConfigurations),
            "requestWidget" => Ok(Self::RequestWidget),
            other => Err(BridgeError::Unimplemented(other.to_string())),
        }
    }
}

/// Value returned under `results`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WidgetsOutput {
    Done(bool),
    Marker(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registered_widgets_keep_only_strings() {
        let call = PluginCall::new("setRegisteredWidgets").arg("widgets", json!(["x", 42, "y"]));
        assert_eq!(
            WidgetsInput::from_call(&call),
            Ok(WidgetsInput::set_registered_widgets(["x", "y"]))
        );
    }

    #[test]
    fn widgets_must_be_an_array() {
        let call = PluginCall::new("setRegisteredWidgets").arg("widgets", "x");
        assert_eq!(
            WidgetsInput::from_call(&call),
            Err(BridgeError::invalid_argument("Missing widgets array"))
        );
    }

    #[test]
    fn reload_timelines_needs_of_kind() {
        let call = PluginCall::new("reloadTimelines");
        assert_eq!(
            WidgetsInput::from_call(&call),
            Err(BridgeError::invalid_argument("Missing ofKind parameter"))
        );
    }
}
