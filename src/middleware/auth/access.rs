//! Authentication stage: bearer session token -> AuthCtx in request extensions.
//!
//! - `Authorization` missing -> 401 "Authorization header is missing"
//! - not exactly `Bearer <token>` (one space, case-sensitive scheme) -> 401
//!   "Invalid Authorization header format"
//! - token rejected by the codec -> 401 with the last segment of the error
//! - otherwise AuthCtx { user_id, primitive_user_id, token } is inserted and
//!   the request continues untouched
//!
//! CPU only: no I/O happens in this stage.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{TokenCodec, extract_identity};

pub const BEARER_SCHEME: &str = "Bearer";

/// Put the authentication stage in front of every route of `router`.
///
/// ```ignore
/// let files = Router::new().route("/files/{id}", get(download));
/// let files = middleware::auth::access::apply(files, codec.clone());
/// ```
pub fn apply<S>(router: Router<S>, codec: Arc<TokenCodec>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(codec, access_middleware))
}

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::HeaderMissing)?;

    if value.is_empty() {
        return Err(AppError::HeaderMissing);
    }

    let value = value.to_str().map_err(|_| AppError::HeaderMalformed)?;

    match value.split_once(' ') {
        Some((BEARER_SCHEME, token)) if !token.contains(' ') => Ok(token),
        _ => Err(AppError::HeaderMalformed),
    }
}

async fn access_middleware(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(err) => {
            tracing::debug!(error = %err, path = %req.uri().path(), "rejected authorization header");
            return Err(err);
        }
    };

    let identity = match extract_identity(&codec, &token) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(
                error = ?err,
                "session token verification failed"
            );
            return Err(AppError::from(err));
        }
    };

    tracing::debug!(
        user_id = %identity.user_id,
        primitive_user_id = %identity.primitive_user_id,
        "request authenticated"
    );

    // middleware -> authorization stage / extractor
    req.extensions_mut().insert(AuthCtx::new(identity, token));

    Ok(next.run(req).await)
}
