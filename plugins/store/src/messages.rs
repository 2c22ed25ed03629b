//! Typed inputs and outputs of the store plugin

use serde::Serialize;
use widget_bridge::{BridgeError, BridgeResult, PluginCall};

/// A validated store request
///
/// # Example
///
/// ```
/// use widget_bridge_store::StoreInput;
///
/// let input = StoreInput::set("group.com.example", "widgetText", "Hello");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreInput {
    Get { group: String, key: String },
    Set {
        group: String,
        key: String,
        value: String,
    },
    Remove { group: String, key: String },
}

impl StoreInput {
    pub fn get(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Get {
            group: group.into(),
            key: key.into(),
        }
    }

    pub fn set(group: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            group: group.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Remove {
            group: group.into(),
            key: key.into(),
        }
    }

    /// Read a `getItem` / `setItem` / `removeItem` call.
    ///
    /// Arguments that are absent, not strings, or empty are missing.
    pub fn from_call(call: &PluginCall) -> BridgeResult<Self> {
        let key = call.get_non_empty_string("key");
        let group = call.get_non_empty_string("group");

        match call.method() {
            "getItem" | "removeItem" => {
                let (Some(key), Some(group)) = (key, group) else {
                    return Err(BridgeError::invalid_argument("Missing key or group"));
                };
                if call.method() == "getItem" {
                    Ok(Self::get(group, key))
                } else {
                    Ok(Self::remove(group, key))
                }
            }
            "setItem" => {
                let value = call.get_non_empty_string("value");
                let (Some(key), Some(group), Some(value)) = (key, group, value) else {
                    return Err(BridgeError::invalid_argument("Missing key, group, or value"));
                };
                Ok(Self::set(group, key, value))
            }
            other => Err(BridgeError::Unimplemented(other.to_string())),
        }
    }
}

/// Value returned under `results`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StoreOutput {
    /// Result of a get; `null` when the key is absent
    Value(Option<String>),
    /// Acknowledgement of a set or remove
    Done(bool),
}

impl StoreOutput {
    /// The retrieved value, if this is a get result holding one
    pub fn value(&self) -> Option<&str> {
        match self {
            StoreOutput::Value(value) => value.as_deref(),
            StoreOutput::Done(_) => None,
        }
    }
}
