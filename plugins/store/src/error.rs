use thiserror::Error;
use widget_bridge::BridgeError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access group file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse group file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid group name: {0:?}")]
    InvalidGroup(String),
    #[error("key '{key}' not found in group '{group}'")]
    KeyNotFound { group: String, key: String },
}

impl From<StoreError> for BridgeError {
    fn from(error: StoreError) -> Self {
        BridgeError::operation_failed(error)
    }
}
