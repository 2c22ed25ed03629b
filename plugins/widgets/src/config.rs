use serde::{Deserialize, Serialize};

/// First platform API level with a pin-widget flow
pub const PIN_FLOW_MIN_API_LEVEL: u32 = 26;

/// Widget plugin settings. Every field has a default, so `{}` is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetsConfig {
    /// Below this API level `requestWidget` rejects with `UnsupportedPlatform`
    pub min_pin_api_level: u32,
    /// Refresh the pinned surface once the user accepts a pin prompt
    pub pin_success_callback: bool,
}

impl Default for WidgetsConfig {
    fn default() -> Self {
        Self {
            min_pin_api_level: PIN_FLOW_MIN_API_LEVEL,
            pin_success_callback: true,
        }
    }
}
