pub mod access;
pub mod permission;

use std::sync::Arc;

use axum::Router;

use crate::services::auth::TokenCodec;
use crate::services::permission::Authorizer;

/// Mount authentication and authorization on `router`, in that order.
///
/// axum runs the most recently added layer first, so authorization is layered
/// before authentication here.
pub fn protect<S>(
    router: Router<S>,
    codec: Arc<TokenCodec>,
    authorizer: Arc<dyn Authorizer>,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = permission::apply(router, authorizer);
    access::apply(router, codec)
}
