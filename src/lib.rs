//! Widget Bridge
//!
//! Routes calls from a scripted UI layer to native plugins and hands the
//! results back synchronously. Each plugin declares the bridge methods it
//! answers, parses the call arguments into a typed input and updates its
//! own state.
//!
//! The two plugins that make up the bridge live in their own crates:
//! `widget_bridge_store` (grouped key/value storage) and
//! `widget_bridge_widgets` (home-screen widget refreshes).
//!
//! # Example
//!
//! ```ignore
//! use widget_bridge::{PluginCall, PluginManager};
//! use widget_bridge_store::StorePlugin;
//!
//! let mut bridge = PluginManager::new();
//! bridge.install(StorePlugin::in_memory());
//!
//! let call = PluginCall::new("setItem")
//!     .arg("group", "group.com.example")
//!     .arg("key", "widgetText")
//!     .arg("value", "Hello");
//! let response = bridge.call(&call)?; // {"results": true}
//! ```

mod call;
mod error;

pub use call::{PluginCall, Results};
pub use error::{BridgeError, BridgeResult};

use serde::Serialize;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Core trait that all bridge plugins implement.
pub trait Plugin: Send + Sync {
    /// Validated input produced from a raw call
    type Input: Send + 'static;

    /// The state type for this plugin
    type State: Send + 'static;

    /// Value placed under `results` in the response
    type Output: Serialize + 'static;

    /// Returns the unique name/identifier for this plugin
    fn name(&self) -> &'static str;

    /// Bridge method names this plugin answers
    fn methods(&self) -> &'static [&'static str];

    /// Initialize the plugin and return its initial state
    fn init(&self) -> Self::State;

    /// Turn a raw call into a typed input.
    ///
    /// Runs before any state is touched, so a rejected call never leaves a
    /// partial mutation behind.
    fn parse(&self, call: &PluginCall) -> BridgeResult<Self::Input>;

    /// Apply an input to the plugin state
    fn update(&self, state: &mut Self::State, input: Self::Input) -> BridgeResult<Self::Output>;
}

/// Wrap a plugin output in the `{"results": ...}` envelope
pub fn respond<O: Serialize>(output: O) -> BridgeResult<Value> {
    serde_json::to_value(Results::new(output)).map_err(BridgeError::operation_failed)
}

/// A typed handle to an installed plugin
pub struct PluginHandle<P: Plugin> {
    plugin_index: usize,
    _phantom: std::marker::PhantomData<fn() -> P>,
}

impl<P: Plugin> Clone for PluginHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Plugin> Copy for PluginHandle<P> {}

impl<P: Plugin> std::fmt::Debug for PluginHandle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PluginHandle {{ plugin_index: {}, plugin: {} }}",
            self.plugin_index,
            std::any::type_name::<P>()
        )
    }
}

impl<P: Plugin + 'static> PluginHandle<P> {
    fn new(plugin_index: usize) -> Self {
        Self {
            plugin_index,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Send a typed input straight to this plugin, skipping method routing
    ///
    /// # Example
    /// ```ignore
    /// let store = bridge.install(StorePlugin::in_memory());
    /// let value = store.call(&mut bridge, StoreInput::get("group.com.example", "widgetText"))?;
    /// ```
    pub fn call(&self, manager: &mut PluginManager, input: P::Input) -> BridgeResult<P::Output> {
        let entry = manager
            .plugins
            .get_mut(self.plugin_index)
            .ok_or_else(|| BridgeError::operation_failed("plugin is not installed"))?;

        match (
            entry.plugin.as_ref().downcast_ref::<P>(),
            entry.state.as_mut().downcast_mut::<P::State>(),
        ) {
            (Some(plugin), Some(state)) => plugin.update(state, input),
            _ => Err(BridgeError::operation_failed(format!(
                "plugin '{}' does not match its handle",
                entry.name
            ))),
        }
    }

    /// Borrow this plugin's state
    pub fn state<'a>(&self, manager: &'a PluginManager) -> Option<&'a P::State> {
        manager
            .plugins
            .get(self.plugin_index)
            .and_then(|entry| entry.state.as_ref().downcast_ref::<P::State>())
    }

    /// Mutably borrow this plugin's state
    pub fn state_mut<'a>(&self, manager: &'a mut PluginManager) -> Option<&'a mut P::State> {
        manager
            .plugins
            .get_mut(self.plugin_index)
            .and_then(|entry| entry.state.as_mut().downcast_mut::<P::State>())
    }
}

type AnyPlugin = Arc<dyn Any + Send + Sync>;
type CallFn = Box<dyn Fn(&mut dyn Any, &PluginCall) -> BridgeResult<Value> + Send + Sync>;

/// Holds a single plugin instance with its state and behavior
struct PluginEntry {
    name: &'static str,
    methods: &'static [&'static str],
    state: Box<dyn Any + Send>,
    state_type_id: TypeId,
    plugin: AnyPlugin,
    call_fn: CallFn,
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PluginEntry {{ name: {}, methods: {:?}, state_type_id: {:?} }}",
            self.name, self.methods, self.state_type_id
        )
    }
}

/// Holds all installed plugins and their states, and routes calls to them.
///
/// Calls are handled one at a time through `&mut self`; the manager does
/// no locking of its own.
pub struct PluginManager {
    plugins: Vec<PluginEntry>,
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PluginManager {{ plugins: {:?} }}", self.plugins)
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginManager {
    /// Create a new empty plugin manager
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Install a plugin into the manager.
    ///
    /// If two plugins declare the same method, the one installed first
    /// answers it.
    pub fn install<P>(&mut self, plugin: P) -> PluginHandle<P>
    where
        P: Plugin + 'static,
    {
        let name = plugin.name();
        let methods = plugin.methods();
        let plugin = Arc::new(plugin);
        let state = plugin.init();
        let plugin_index = self.plugins.len();

        for method in methods {
            if let Some(owner) = self.owner_of(method) {
                tracing::warn!(plugin = name, method, owner, "Method already handled by another plugin");
            }
        }

        let plugin_for_call = Arc::clone(&plugin);
        let call_fn: CallFn = Box::new(move |state: &mut dyn Any, call: &PluginCall| {
            let state = state.downcast_mut::<P::State>().ok_or_else(|| {
                BridgeError::operation_failed(format!("state of plugin '{}' is corrupted", name))
            })?;
            let input = plugin_for_call.parse(call)?;
            let output = plugin_for_call.update(state, input)?;
            respond(output)
        });

        self.plugins.push(PluginEntry {
            name,
            methods,
            state: Box::new(state),
            state_type_id: TypeId::of::<P::State>(),
            plugin,
            call_fn,
        });

        tracing::debug!(plugin = name, plugin_index, "Installed plugin");
        PluginHandle::new(plugin_index)
    }

    /// Route a call to the plugin that declares its method.
    ///
    /// Resolves to the `{"results": ...}` envelope or rejects with a
    /// [`BridgeError`]. Unknown methods reject with
    /// [`BridgeError::Unimplemented`].
    pub fn call(&mut self, call: &PluginCall) -> BridgeResult<Value> {
        let method = call.method();
        let Some(entry) = self
            .plugins
            .iter_mut()
            .find(|entry| entry.methods.iter().any(|m| *m == method))
        else {
            return Err(BridgeError::Unimplemented(method.to_string()));
        };

        tracing::debug!(plugin = entry.name, method, "Bridge call");
        let result = (entry.call_fn)(entry.state.as_mut(), call);
        if let Err(error) = &result {
            tracing::debug!(plugin = entry.name, method, code = error.code(), %error, "Bridge call rejected");
        }
        result
    }

    fn owner_of(&self, method: &str) -> Option<&'static str> {
        self.plugins
            .iter()
            .find(|entry| entry.methods.iter().any(|m| *m == method))
            .map(|entry| entry.name)
    }
}

// Registration metadata
impl PluginManager {
    /// Get the number of installed plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Get a list of all installed plugin names in order
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name).collect()
    }

    /// Every routable method, in install order
    pub fn method_names(&self) -> Vec<&'static str> {
        self.plugins
            .iter()
            .flat_map(|p| p.methods.iter().copied())
            .collect()
    }

    pub fn get_plugin_state<P: Plugin>(&self) -> Option<&P::State> {
        self.plugins
            .iter()
            .find(|p| TypeId::of::<P::State>() == p.state_type_id)
            .and_then(|p| p.state.as_ref().downcast_ref::<P::State>())
    }

    pub fn get_plugin_state_mut<P: Plugin>(&mut self) -> Option<&mut P::State> {
        self.plugins
            .iter_mut()
            .find(|p| TypeId::of::<P::State>() == p.state_type_id)
            .and_then(|p| p.state.as_mut().downcast_mut::<P::State>())
    }
}

/// Builder pattern for constructing a PluginManager
pub struct PluginManagerBuilder {
    plugins: Vec<Box<dyn FnOnce(&mut PluginManager) + Send>>,
}

impl PluginManagerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Add a plugin
    pub fn with_plugin<P>(mut self, plugin: P) -> Self
    where
        P: Plugin + 'static,
    {
        self.plugins
            .push(Box::new(move |manager: &mut PluginManager| {
                let _ = manager.install(plugin);
            }));
        self
    }

    /// Build the plugin manager
    pub fn build(self) -> PluginManager {
        let mut manager = PluginManager::new();
        for install_fn in self.plugins {
            install_fn(&mut manager);
        }
        manager
    }
}

impl Default for PluginManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    enum CounterInput {
        Add(i64),
        Get,
    }

    #[derive(Debug, Clone)]
    struct CounterPlugin;

    impl Plugin for CounterPlugin {
        type Input = CounterInput;
        type State = i64;
        type Output = i64;

        fn name(&self) -> &'static str {
            "counter"
        }

        fn methods(&self) -> &'static [&'static str] {
            &["add", "get"]
        }

        fn init(&self) -> Self::State {
            0
        }

        fn parse(&self, call: &PluginCall) -> BridgeResult<Self::Input> {
            match call.method() {
                "add" => call
                    .get("by")
                    .and_then(Value::as_i64)
                    .map(CounterInput::Add)
                    .ok_or_else(|| BridgeError::invalid_argument("Missing by")),
                _ => Ok(CounterInput::Get),
            }
        }

        fn update(&self, state: &mut Self::State, input: Self::Input) -> BridgeResult<i64> {
            if let CounterInput::Add(by) = input {
                *state += by;
            }
            Ok(*state)
        }
    }

    #[derive(Debug, Clone)]
    struct ShadowPlugin;

    impl Plugin for ShadowPlugin {
        type Input = ();
        type State = ();
        type Output = &'static str;

        fn name(&self) -> &'static str {
            "shadow"
        }

        fn methods(&self) -> &'static [&'static str] {
            &["get", "echo"]
        }

        fn init(&self) -> Self::State {}

        fn parse(&self, _call: &PluginCall) -> BridgeResult<Self::Input> {
            Ok(())
        }

        fn update(&self, _state: &mut Self::State, _input: ()) -> BridgeResult<&'static str> {
            Ok("shadow")
        }
    }

    #[test]
    fn routes_by_method_name() {
        let mut manager = PluginManager::new();
        manager.install(CounterPlugin);

        let response = manager.call(&PluginCall::new("add").arg("by", 3)).unwrap();
        assert_eq!(response, json!({ "results": 3 }));

        let response = manager.call(&PluginCall::new("get")).unwrap();
        assert_eq!(response, json!({ "results": 3 }));
    }

    #[test]
    fn unknown_method_is_unimplemented() {
        let mut manager = PluginManager::new();
        manager.install(CounterPlugin);

        let err = manager.call(&PluginCall::new("missing")).unwrap_err();
        assert_eq!(err, BridgeError::Unimplemented("missing".into()));
    }

    #[test]
    fn rejected_parse_leaves_state_untouched() {
        let mut manager = PluginManager::new();
        manager.install(CounterPlugin);

        let err = manager.call(&PluginCall::new("add")).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert_eq!(manager.get_plugin_state::<CounterPlugin>(), Some(&0));
    }

    #[test]
    fn first_installed_plugin_owns_a_method() {
        let mut manager = PluginManagerBuilder::new()
            .with_plugin(CounterPlugin)
            .with_plugin(ShadowPlugin)
            .build();

        assert_eq!(manager.plugin_names(), vec!["counter", "shadow"]);
        assert_eq!(manager.method_names(), vec!["add", "get", "get", "echo"]);
        assert_eq!(manager.call(&PluginCall::new("get")).unwrap(), json!({ "results": 0 }));
        assert_eq!(
            manager.call(&PluginCall::new("echo")).unwrap(),
            json!({ "results": "shadow" })
        );
    }

    #[test]
    fn handle_calls_bypass_routing() {
        let mut manager = PluginManager::new();
        let counter = manager.install(CounterPlugin);

        assert_eq!(counter.call(&mut manager, CounterInput::Add(5)), Ok(5));
        assert_eq!(counter.state(&manager), Some(&5));

        if let Some(state) = counter.state_mut(&mut manager) {
            *state = 1;
        }
        assert_eq!(counter.call(&mut manager, CounterInput::Get), Ok(1));
    }
}
