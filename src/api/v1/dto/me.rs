use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub primitive_user_id: String,
}
