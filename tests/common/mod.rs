#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use service_auth::api::v1::extractors::{AuthCtxExtractor, ContextKey};
use service_auth::services::auth::{TokenCodec, TokenConfig};
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-test-secret-0123456789";

pub fn codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(&TokenConfig::new(SECRET, 60)).unwrap())
}

/// Handler that echoes what the auth stages put into the request.
pub async fn echo_ctx(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<Value> {
    Json(json!({
        "userId": ctx.get(ContextKey::UserId),
        "primitiveUserId": ctx.get(ContextKey::PrimitiveUserId),
        "token": ctx.get(ContextKey::Token),
    }))
}

pub async fn send(app: Router, method: Method, uri: &str, authorization: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
