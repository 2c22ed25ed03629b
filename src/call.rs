//! Bridge calls and the response envelope

use serde::Serialize;
use serde_json::{Map, Value};

/// A single call issued by the host runtime: a method name plus its
/// named arguments.
///
/// # Example
///
/// ```
/// use widget_bridge::PluginCall;
///
/// let call = PluginCall::new("getItem")
///     .arg("key", "widgetText")
///     .arg("group", "group.com.example");
///
/// assert_eq!(call.get_string("key"), Some("widgetText"));
/// assert_eq!(call.get_string("value"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PluginCall {
    method: String,
    args: Map<String, Value>,
}

impl PluginCall {
    /// Create a call without arguments
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Map::new(),
        }
    }

    /// Create a call from a JSON argument object.
    ///
    /// Anything other than an object is treated as "no arguments".
    pub fn with_args(method: impl Into<String>, args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            method: method.into(),
            args,
        }
    }

    /// Add an argument
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Raw argument value, if present
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// String argument. Absent and non-string values both read as `None`.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(Value::as_str)
    }

    /// String argument that must also be non-empty
    pub fn get_non_empty_string(&self, name: &str) -> Option<&str> {
        self.get_string(name).filter(|s| !s.is_empty())
    }

    /// Array argument. Absent and non-array values both read as `None`.
    pub fn get_array(&self, name: &str) -> Option<&Vec<Value>> {
        self.args.get(name).and_then(Value::as_array)
    }
}

/// Response envelope: every successful call resolves to `{"results": ...}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Results<T> {
    pub results: T,
}

impl<T> Results<T> {
    pub fn new(results: T) -> Self {
        Self { results }
    }
}
