//! Authorization stage: AuthCtx + (path, method) -> allow / 400 / 403.
//!
//! Must sit behind the authentication stage. If no AuthCtx is present the
//! request fails with 500 instead of being let through.
//!
//! The path checked is the one the client requested, before any `Router::nest`
//! prefix stripping, so permission maps hold full paths.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::permission::{Authorizer, PermissionError, PermissionQuery};

pub fn apply<S>(router: Router<S>, authorizer: Arc<dyn Authorizer>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(authorizer, permission_middleware))
}

fn requested_path(req: &Request<Body>) -> String {
    match req.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_string(),
        None => req.uri().path().to_string(),
    }
}

async fn permission_middleware(
    State(authorizer): State<Arc<dyn Authorizer>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(ctx) = req.extensions().get::<AuthCtx>().cloned() else {
        tracing::error!(
            path = %req.uri().path(),
            "authorization stage reached without an authenticated context; is the authentication stage mounted?"
        );
        return Err(AppError::Internal);
    };
    let path = requested_path(&req);
    let method = req.method().as_str().to_string();

    let query = PermissionQuery {
        primitive_user_id: &ctx.primitive_user_id,
        path: &path,
        method: &method,
    };

    match authorizer.authorize(&query).await {
        Ok(()) => {}
        Err(PermissionError::Unavailable(message)) => {
            tracing::warn!(
                error = %message,
                primitive_user_id = %query.primitive_user_id,
                "permission source failed"
            );
            return Err(AppError::PermissionSourceUnavailable(message));
        }
        Err(PermissionError::Denied(message)) => {
            tracing::info!(
                user_id = %ctx.user_id,
                primitive_user_id = %query.primitive_user_id,
                path = %query.path,
                method = %query.method,
                "permission denied"
            );
            return Err(AppError::PermissionDenied(message));
        }
    }

    Ok(next.run(req).await)
}
