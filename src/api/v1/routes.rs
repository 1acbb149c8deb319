/*
 * Responsibility
 * - URL layout of v1
 * - Decides which routes sit behind the auth stages (everything but /health)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new().route("/me", get(me));
    let protected = middleware::protect(protected, state.codec.clone(), state.authorizer.clone());

    Router::new()
        .route("/health", get(health))
        .merge(protected)
}
