#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use donut_api::auth::jwt::{encode_token, Claims, JwtConfig};
use donut_api::config::ServerConfig;
use donut_api::router::build_app_router;
use donut_api::state::{AppState, PipelineHandles};
use donut_canva::{CanvaApi, CanvaConfig};
use donut_openai::{OpenAiClient, OpenAiConfig};

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Nothing listens here; tests never reach the external services.
const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        design_poll_interval_secs: 300,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

fn test_canva() -> CanvaApi {
    CanvaApi::new(CanvaConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://localhost:3001/canva/callback".to_string(),
        api_base_url: UNREACHABLE.to_string(),
        authorize_url: "https://canva.test/api/oauth/authorize".to_string(),
        scopes: "design:content:write".to_string(),
    })
}

fn test_text() -> Arc<OpenAiClient> {
    Arc::new(OpenAiClient::new(OpenAiConfig {
        api_key: "test-key".to_string(),
        base_url: UNREACHABLE.to_string(),
        model: "test-model".to_string(),
        temperature: 0.0,
    }))
}

/// Build the application router plus the pipeline handles.
///
/// No worker consumes the generation queue, so scheduled runs stay
/// `queued` for as long as the returned handles are alive.
pub fn build_test_app_with_pipeline(pool: PgPool) -> (Router, PipelineHandles) {
    let config = test_config();
    let (state, handles) = AppState::new(pool, config.clone(), test_canva(), test_text());
    (build_app_router(state, &config), handles)
}

/// Build the application router. Generation requests fail with 503 because
/// the queue has no receiver.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_pipeline(pool).0
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// A bearer token for the identity `sub`.
pub fn token_for(sub: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        name: Some(format!("User {sub}")),
        email: Some(format!("{sub}@donut.test")),
        exp: now + 3600,
        iat: now,
    };
    encode_token(
        &claims,
        &JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    )
    .unwrap()
}

/// Register `sub` through `POST /users/me` and return its token.
pub async fn register(app: &Router, sub: &str) -> String {
    let token = token_for(sub);
    let response = send(app.clone(), Method::POST, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    token
}

/// Register `sub` and create an organization it administers.
///
/// Returns the token and the organization id.
pub async fn admin_with_org(app: &Router, sub: &str) -> (String, i64) {
    let token = register(app, sub).await;
    let response = post_json_auth(
        app.clone(),
        "/api/v1/organizations",
        &token,
        serde_json::json!({ "name": format!("{sub} Donuts") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (token, json["data"]["id"].as_i64().unwrap())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
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

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
