use serde::{Deserialize, Serialize};

/// Body POSTed to the external authorization service:
/// "may `primitive_user_id` perform `requested_method` on `requested_url`?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionValidationRequest {
    pub validate_by: String,
    pub primitive_user_id: String,
    pub requested_url: String,
    pub requested_method: String,
}
