use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Simple acknowledgement reply used by mutation endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AckResponse {
    /// Whether the operation took effect
    pub success: bool,

    /// Optional human-readable context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AckResponse {
    /// Acknowledge a successful operation
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Report a no-op or refused operation, with context
    pub fn refused(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}
