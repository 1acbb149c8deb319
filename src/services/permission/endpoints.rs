use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::source::{Authorizer, PermissionError, PermissionMap, PermissionQuery, PermissionSource};

/// Authorizes by fetching the caller's permission map on every request and
/// looking the request up in it.
///
/// Matching is exact: the path must be a key of the map and the recorded
/// method must equal the request method byte for byte. No wildcards, no
/// prefixes, no case folding.
#[derive(Clone)]
pub struct EndpointPermissions {
    source: Arc<dyn PermissionSource>,
}

impl EndpointPermissions {
    pub fn new(source: Arc<dyn PermissionSource>) -> Self {
        Self { source }
    }
}

pub fn permits(map: &PermissionMap, path: &str, method: &str) -> bool {
    map.get(path).is_some_and(|allowed| allowed == method)
}

#[async_trait]
impl Authorizer for EndpointPermissions {
    async fn authorize(&self, query: &PermissionQuery<'_>) -> Result<(), PermissionError> {
        let map = self
            .source
            .user_permission_endpoints(query.primitive_user_id)
            .await?;

        if permits(&map, query.path, query.method) {
            Ok(())
        } else {
            Err(PermissionError::denied())
        }
    }
}

/// In-process permission source keyed by `primitive_user_id`.
///
/// Useful for services that load their grants at startup, and for tests.
/// Unknown principals get an empty map (everything denied).
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionSource {
    grants: HashMap<String, PermissionMap>,
}

impl StaticPermissionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(
        mut self,
        primitive_user_id: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        self.grants
            .entry(primitive_user_id.into())
            .or_default()
            .insert(path.into(), method.into());
        self
    }
}

#[async_trait]
impl PermissionSource for StaticPermissionSource {
    async fn user_permission_endpoints(
        &self,
        primitive_user_id: &str,
    ) -> Result<PermissionMap, PermissionError> {
        Ok(self.grants.get(primitive_user_id).cloned().unwrap_or_default())
    }
}
