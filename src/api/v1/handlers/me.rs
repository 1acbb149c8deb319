/*
 * Responsibility
 * - GET /me: echo the authenticated identity
 * - Only reachable once both auth stages have passed
 */
use axum::Json;

use crate::api::v1::dto::MeResponse;
use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: ctx.user_id,
        primitive_user_id: ctx.primitive_user_id,
    })
}
