//! Bridge plugin exposing the store

use crate::app_name::{AppName, StorageLocation};
use crate::messages::{StoreInput, StoreOutput};
use crate::storage::StoreBackend;
use crate::store::NamespacedStore;
use widget_bridge::{BridgeResult, Plugin, PluginCall};

/// Bridge plugin answering `getItem`, `setItem` and `removeItem`
///
/// # Example
///
/// ```ignore
/// use widget_bridge::PluginManager;
/// use widget_bridge_store::{AppName, StorePlugin, StoreInput};
///
/// let mut bridge = PluginManager::new();
/// let store = bridge.install(StorePlugin::for_app(&AppName::new("com", "example", "myapp")));
/// store.call(&mut bridge, StoreInput::set("group.com.example", "widgetText", "Hello"))?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct StorePlugin {
    backend: StoreBackend,
}

impl StorePlugin {
    pub const METHODS: &'static [&'static str] = &["getItem", "setItem", "removeItem"];

    pub fn new(backend: StoreBackend) -> Self {
        Self { backend }
    }

    /// Groups live only as long as the process
    pub fn in_memory() -> Self {
        Self::new(StoreBackend::Memory)
    }

    /// JSON files under the application's config directory
    pub fn for_app(app_name: &AppName) -> Self {
        Self::new(StoreBackend::Json {
            root: StorageLocation::for_app(app_name),
        })
    }
}

impl Plugin for StorePlugin {
    type Input = StoreInput;
    type State = NamespacedStore;
    type Output = StoreOutput;

    fn name(&self) -> &'static str {
        "store"
    }

    fn methods(&self) -> &'static [&'static str] {
        Self::METHODS
    }

    fn init(&self) -> Self::State {
        NamespacedStore::new(self.backend.open())
    }

    fn parse(&self, call: &PluginCall) -> BridgeResult<Self::Input> {
        StoreInput::from_call(call)
    }

    fn update(&self, state: &mut Self::State, input: Self::Input) -> BridgeResult<Self::Output> {
        match input {
            StoreInput::Get { group, key } => state.get(&group, &key).map(StoreOutput::Value),
            StoreInput::Set { group, key, value } => {
                state.set(&group, &key, &value)?;
                Ok(StoreOutput::Done(true))
            }
            StoreInput::Remove { group, key } => {
                state.remove(&group, &key)?;
                Ok(StoreOutput::Done(true))
            }
        }
    }
}
