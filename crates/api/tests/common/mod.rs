#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use pioneer_api::auth::jwt::{generate_access_token, JwtConfig};
use pioneer_api::config::ServerConfig;
use pioneer_api::router::build_app_router;
use pioneer_api::state::AppState;
use pioneer_core::types::MemberId;
use pioneer_db::repositories::MemberRepo;
use pioneer_events::NotifierConfig;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8080".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            token_expiry_days: 90,
        },
        notifier: None,
    }
}

/// Notifier settings pointing at an indexer that is never contacted.
pub fn test_notifier_config() -> NotifierConfig {
    NotifierConfig {
        indexer_url: "http://127.0.0.1:4350/graphql".to_string(),
        poll_interval: Duration::from_secs(60),
        start_block: 0,
        page_size: 100,
    }
}

/// Build the full application router on top of `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a member and return a bearer token for them.
pub async fn member_token(pool: &PgPool, member_id: MemberId) -> String {
    MemberRepo::create(pool, member_id, &format!("member{member_id}"))
        .await
        .expect("member creation should succeed");
    generate_access_token(member_id, &test_config().jwt).expect("token generation should succeed")
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
