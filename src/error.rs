//! Rejections returned to the host runtime

use thiserror::Error;

/// Result alias used by every bridge operation
pub type BridgeResult<T> = Result<T, BridgeError>;

/// A rejected bridge call.
///
/// Every variant carries the human-readable message that is handed back to
/// the caller. [`BridgeError::code`] gives a stable machine-readable kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A required parameter is missing or has the wrong shape
    #[error("{0}")]
    InvalidArgument(String),
    /// A referenced widget surface or registry entry does not exist
    #[error("{0}")]
    NotFound(String),
    /// The platform version is too old for the operation
    #[error("{0}")]
    UnsupportedPlatform(String),
    /// The platform lacks a capability the operation needs
    #[error("{0}")]
    Unsupported(String),
    /// An underlying OS call failed
    #[error("Error: {0}")]
    OperationFailed(String),
    /// No installed plugin handles the called method
    #[error("method not implemented: {0}")]
    Unimplemented(String),
}

impl BridgeError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn operation_failed(message: impl ToString) -> Self {
        Self::OperationFailed(message.to_string())
    }

    /// Stable identifier for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::InvalidArgument(_) => "INVALID_ARGUMENT",
            BridgeError::NotFound(_) => "NOT_FOUND",
            BridgeError::UnsupportedPlatform(_) => "UNSUPPORTED_PLATFORM",
            BridgeError::Unsupported(_) => "UNSUPPORTED",
            BridgeError::OperationFailed(_) => "OPERATION_FAILED",
            BridgeError::Unimplemented(_) => "UNIMPLEMENTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_failed_keeps_underlying_message() {
        let err = BridgeError::operation_failed("disk full");
        assert_eq!(err.to_string(), "Error: disk full");
        assert_eq!(err.code(), "OPERATION_FAILED");
    }

    #[test]
    fn messages_are_passed_through() {
        let err = BridgeError::invalid_argument("Missing key or group");
        assert_eq!(err.to_string(), "Missing key or group");
        assert_eq!(err.code(), "INVALID_ARGUMENT");
    }
}
