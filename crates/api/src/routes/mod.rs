pub mod health;
pub mod metrics;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shipments;

use serde::Serialize;

/// Product codes are short identifiers; requests carrying a longer one
/// are rejected before the core is called.
pub const MAX_CODE_LEN: usize = 10;

/// The `{message, data?}` envelope every endpoint responds with.
#[derive(Serialize)]
pub struct ApiResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    /// A message-only response.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    /// A response carrying a data payload.
    pub fn with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}
