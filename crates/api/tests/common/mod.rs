//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the application through [`build_app_router`] so tests exercise the
//! exact middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use cmms_api::auth::jwt::{generate_access_token, JwtConfig};
use cmms_api::auth::password::hash_password;
use cmms_api::config::ServerConfig;
use cmms_api::router::build_app_router;
use cmms_api::state::AppState;
use cmms_db::models::user::User;
use cmms_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a fixed JWT secret, and no chat provider.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        chat: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        http: reqwest::Client::new(),
    };
    build_app_router(state, &config)
}

/// Create a user directly in the database and return the row plus the
/// plaintext password used.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let password = "correct horse battery staple 7!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let user = UserRepo::create_with_password(pool, email, "Test User", role, &hashed)
        .await
        .expect("user creation should succeed");
    (user, password.to_string())
}

/// Create a user and mint an access token for it without going through the
/// login endpoint.
pub async fn auth_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let (user, _) = create_user(pool, email, role).await;
    let token = generate_access_token(user.id, role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Log in via the API and return the auth response body.
pub async fn login(app: Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, None).await
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, Some(token)).await
}

/// Send a POST request with a JSON body, no authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    request(app, Method::POST, uri, Some(body), None).await
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    request(app, Method::POST, uri, Some(body), Some(token)).await
}

/// Send a PUT request with a JSON body and a bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    request(app, Method::PUT, uri, Some(body), Some(token)).await
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::DELETE, uri, None, Some(token)).await
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

async fn request(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("request should complete")
}
