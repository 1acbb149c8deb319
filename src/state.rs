/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Everything inside is read-only after startup and cheap to clone (Arc)
 */
use std::sync::Arc;

use crate::services::auth::TokenCodec;
use crate::services::permission::Authorizer;

#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    pub fn new(codec: Arc<TokenCodec>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { codec, authorizer }
    }
}
