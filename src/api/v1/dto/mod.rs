pub mod api_response;
pub mod me;
pub mod permission;

pub use api_response::ApiResponse;
pub use me::MeResponse;
pub use permission::PermissionValidationRequest;
