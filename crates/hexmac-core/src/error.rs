//! Error types surfaced to the UI layer
//!
//! Every failure of a bridge call ends up as an [`ErrorResponse`] with a stable
//! `code` the frontend can switch on.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::permissions::ProviderError;
use crate::visibility::VisibilityError;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Method not implemented: {method}")]
    UnimplementedMethod { method: String },

    #[error("Invalid arguments for {method}: {reason}")]
    InvalidArguments { method: String, reason: String },

    #[error("Permission provider unavailable: {0}")]
    Provider(#[from] ProviderError),

    #[error("Window unavailable: {0}")]
    Window(#[from] VisibilityError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::UnimplementedMethod { .. } => "UnimplementedMethod",
            BridgeError::InvalidArguments { .. } => "InvalidArguments",
            BridgeError::Provider(_) => "ProviderUnavailable",
            BridgeError::Window(_) => "WindowUnavailable",
            BridgeError::Serialization(_) => "SerializationError",
        }
    }
}

/// Error payload for the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<BridgeError> for ErrorResponse {
    fn from(error: BridgeError) -> Self {
        ErrorResponse {
            code: error.code().to_string(),
            message: Some(error.to_string()),
        }
    }
}

/// Envelope returned for every bridge call: `{"ok": ...}` or `{"error": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BridgeResponse {
    Ok(Value),
    Error(ErrorResponse),
}

impl From<BridgeResult<Value>> for BridgeResponse {
    fn from(result: BridgeResult<Value>) -> Self {
        match result {
            Ok(value) => BridgeResponse::Ok(value),
            Err(e) => BridgeResponse::Error(e.into()),
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
