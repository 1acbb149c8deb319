//! Authenticate -> authorize pipeline, driven through an axum Router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    http::{Method, StatusCode},
    routing::{delete, get, post},
};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use service_auth::middleware::{self, auth::permission};
use service_auth::services::permission::{
    Authorizer, EndpointPermissions, PermissionError, PermissionMap, PermissionSource,
    StaticPermissionSource,
};

mod common;
use common::{bearer, codec, echo_ctx, json_body, send};

const DENIED: &str = "You do not have permission to perform this action";

struct UnreachableSource;

#[async_trait]
impl PermissionSource for UnreachableSource {
    async fn user_permission_endpoints(
        &self,
        _primitive_user_id: &str,
    ) -> Result<PermissionMap, PermissionError> {
        Err(PermissionError::Unavailable(
            "permission service unreachable".to_string(),
        ))
    }
}

fn authorizer(source: StaticPermissionSource) -> Arc<dyn Authorizer> {
    Arc::new(EndpointPermissions::new(Arc::new(source)))
}

fn app(authorizer: Arc<dyn Authorizer>) -> Router {
    let routes = Router::new()
        .route("/res", get(echo_ctx).post(echo_ctx))
        .route("/files/delete", delete(echo_ctx).get(echo_ctx))
        .route("/files/other", delete(echo_ctx));
    middleware::protect(routes, codec(), authorizer)
}

fn res_app() -> Router {
    app(authorizer(
        StaticPermissionSource::new().grant("p1", "/res", "POST"),
    ))
}

#[tokio::test]
async fn end_to_end_allowed_request_reaches_handler_with_context() {
    let token = codec().issue("u1", "p1").unwrap();

    let response = send(res_app(), Method::POST, "/res", Some(&bearer(&token))).await;
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"userId": "u1", "primitiveUserId": "p1", "token": token})
    );
}

#[tokio::test]
async fn end_to_end_wrong_method_is_forbidden_with_exact_body() {
    let token = codec().issue("u1", "p1").unwrap();

    let response = send(res_app(), Method::GET, "/res", Some(&bearer(&token))).await;
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"message": DENIED, "extra_data": null}));
}

#[tokio::test]
async fn missing_header_is_rejected_before_authorization() {
    let (status, body) = json_body(send(res_app(), Method::POST, "/res", None).await).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"message": "Authorization header is missing", "extra_data": null})
    );
}

#[tokio::test]
async fn malformed_headers_are_rejected() {
    let token = codec().issue("u1", "p1").unwrap();

    for value in [
        "Token abc".to_string(),
        "Bearer".to_string(),
        format!("bearer {token}"),
        format!("Bearer  {token}"),
    ] {
        let (status, body) = json_body(send(res_app(), Method::POST, "/res", Some(&value)).await).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{value:?}");
        assert_eq!(body["message"], "Invalid Authorization header format", "{value:?}");
        assert!(body["extra_data"].is_null());
    }
}

#[tokio::test]
async fn token_failures_expose_only_the_last_segment() {
    let codec = codec();
    let expired = codec
        .issue_at("u1", "p1", Utc::now() - ChronoDuration::minutes(61))
        .unwrap();

    let valid = codec.issue("u1", "p1").unwrap();
    let (signing_input, _) = valid.rsplit_once('.').unwrap();
    let forged = format!("{signing_input}.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    let (rest, last) = valid.split_at(valid.len() - 1);
    let swapped = format!("{rest}{}", if last == "o" { "p" } else { "o" });

    let cases = [
        (expired, "token is expired"),
        (forged, "signature is invalid"),
        (swapped, "signature is invalid"),
        ("not-a-token".to_string(), "token is malformed"),
        (String::new(), "token is malformed"),
    ];

    for (token, expected) in cases {
        let (status, body) =
            json_body(send(res_app(), Method::POST, "/res", Some(&bearer(&token))).await).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{token:?}");
        assert_eq!(body, json!({"message": expected, "extra_data": null}));
    }
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    use service_auth::services::auth::{TokenCodec, TokenConfig};

    let other = TokenCodec::new(&TokenConfig::new(&b"some-other-service-secret"[..], 60)).unwrap();
    let token = other.issue("u1", "p1").unwrap();

    let (status, body) =
        json_body(send(res_app(), Method::POST, "/res", Some(&bearer(&token))).await).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "signature is invalid");
}

#[tokio::test]
async fn permission_map_matching_is_exact() {
    let token = codec().issue("u1", "p1").unwrap();
    let auth = bearer(&token);
    let source = StaticPermissionSource::new().grant("p1", "/files/delete", "DELETE");

    let allowed = send(app(authorizer(source.clone())), Method::DELETE, "/files/delete", Some(&auth)).await;
    assert_eq!(allowed.status(), StatusCode::OK);

    let wrong_method = send(app(authorizer(source.clone())), Method::GET, "/files/delete", Some(&auth)).await;
    assert_eq!(wrong_method.status(), StatusCode::FORBIDDEN);

    let wrong_path = send(app(authorizer(source)), Method::DELETE, "/files/other", Some(&auth)).await;
    assert_eq!(wrong_path.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn permissions_are_looked_up_by_primitive_user_id() {
    // Same user id, different owning entity: the grant does not carry over.
    let token = codec().issue("u1", "p2").unwrap();

    let response = send(res_app(), Method::POST, "/res", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn permission_source_failure_is_bad_request() {
    let token = codec().issue("u1", "p1").unwrap();
    let app = app(Arc::new(EndpointPermissions::new(Arc::new(UnreachableSource))));

    let (status, body) = json_body(send(app, Method::POST, "/res", Some(&bearer(&token))).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"message": "permission service unreachable", "extra_data": null})
    );
}

#[tokio::test]
async fn authorization_without_authentication_fails_closed() {
    let routes = Router::new().route("/res", post(echo_ctx));
    let app = permission::apply(
        routes,
        authorizer(StaticPermissionSource::new().grant("p1", "/res", "POST")),
    );

    let response = send(app, Method::POST, "/res", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn nested_routes_are_authorized_by_full_path() {
    let token = codec().issue("u1", "p1").unwrap();
    let inner = app(authorizer(
        StaticPermissionSource::new().grant("p1", "/api/v1/res", "POST"),
    ));
    let nested = Router::new().nest("/api/v1", inner);

    let response = send(nested.clone(), Method::POST, "/api/v1/res", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let inner_only = app(authorizer(StaticPermissionSource::new().grant("p1", "/res", "POST")));
    let nested = Router::new().nest("/api/v1", inner_only);
    let response = send(nested, Method::POST, "/api/v1/res", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_routes_are_not_behind_the_stages() {
    let response = send(res_app(), Method::GET, "/does-not-exist", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn service_routes_keep_health_public_and_me_protected() {
    use service_auth::{api, state::AppState};

    let state = AppState::new(
        codec(),
        authorizer(StaticPermissionSource::new().grant("p1", "/api/v1/me", "GET")),
    );
    let app: Router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    let (status, body) = json_body(send(app.clone(), Method::GET, "/api/v1/health", None).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let response = send(app.clone(), Method::GET, "/api/v1/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = codec().issue("u1", "p1").unwrap();
    let (status, body) =
        json_body(send(app, Method::GET, "/api/v1/me", Some(&bearer(&token))).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "u1");
    assert_eq!(body["primitive_user_id"], "p1");
}
