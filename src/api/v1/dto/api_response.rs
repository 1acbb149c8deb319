/*
 * Responsibility
 * - The JSON envelope shared by every service: {"message": ..., "extra_data": ...}
 * - Rejections from the auth middleware use it with extra_data = null
 * - The remote authorization service answers with the same shape
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extra_data: Option<Value>,
}

impl ApiResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extra_data: None,
        }
    }
}
