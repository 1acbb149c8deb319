//! Permission capabilities consumed by the authorization middleware.
//!
//! Two seams:
//! - [`PermissionSource`]: "which (path -> method) pairs may this principal call?"
//! - [`Authorizer`]: "may this principal call this (path, method)?"
//!
//! The middleware only talks to an `Authorizer`. Map-backed sources are adapted
//! by [`EndpointPermissions`](super::endpoints::EndpointPermissions); the
//! remote authorization service implements `Authorizer` directly.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Path -> the single HTTP method allowed on it.
pub type PermissionMap = HashMap<String, String>;

pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// The source could not be reached or gave an unusable answer.
    #[error("{0}")]
    Unavailable(String),

    /// The principal is authenticated but not entitled.
    #[error("{0}")]
    Denied(String),
}

impl PermissionError {
    pub fn denied() -> Self {
        Self::Denied(PERMISSION_DENIED_MESSAGE.to_string())
    }
}

/// The question the authorization stage asks for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionQuery<'a> {
    pub primitive_user_id: &'a str,
    pub path: &'a str,
    pub method: &'a str,
}

#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn user_permission_endpoints(
        &self,
        primitive_user_id: &str,
    ) -> Result<PermissionMap, PermissionError>;
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    /// `Ok(())` means the request may proceed.
    async fn authorize(&self, query: &PermissionQuery<'_>) -> Result<(), PermissionError>;
}
