/*
 * Responsibility
 * - The authenticated request context handlers see
 * - The authentication middleware inserts it into request extensions; the
 *   authorization middleware and handlers only ever read it
 *
 * Notes
 * - One typed value in the extensions map, so nothing else can collide with it
 * - ContextKey names the three values for callers that address them by key
 */
use std::fmt;

use crate::services::auth::VerifiedIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    UserId,
    PrimitiveUserId,
    Token,
}

impl ContextKey {
    pub const ALL: [ContextKey; 3] = [Self::UserId, Self::PrimitiveUserId, Self::Token];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserId => "userId",
            Self::PrimitiveUserId => "primitiveUserId",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attached to a request that passed authentication.
///
/// - `user_id`: the authenticated principal
/// - `primitive_user_id`: the owning entity permissions are granted to
/// - `token`: the raw bearer token, for forwarding to downstream services
#[derive(Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
    pub primitive_user_id: String,
    pub token: String,
}

impl fmt::Debug for AuthCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The bearer token is a credential; keep it out of logs.
        f.debug_struct("AuthCtx")
            .field("user_id", &self.user_id)
            .field("primitive_user_id", &self.primitive_user_id)
            .finish_non_exhaustive()
    }
}

impl AuthCtx {
    pub fn new(identity: VerifiedIdentity, token: impl Into<String>) -> Self {
        Self {
            user_id: identity.user_id,
            primitive_user_id: identity.primitive_user_id,
            token: token.into(),
        }
    }

    pub fn get(&self, key: ContextKey) -> &str {
        match key {
            ContextKey::UserId => &self.user_id,
            ContextKey::PrimitiveUserId => &self.primitive_user_id,
            ContextKey::Token => &self.token,
        }
    }
}
