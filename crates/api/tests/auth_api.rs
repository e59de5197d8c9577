//! HTTP-level integration tests for authentication: login, lockout,
//! token refresh, logout, and invite redemption.

mod common;

use axum::http::StatusCode;
use common::{body_json, login, post_json, post_json_auth};
use sqlx::PgPool;
use cmms_db::repositories::UserRepo;

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_tokens_and_user_info(pool: PgPool) {
    let (user, password) = common::create_user(&pool, "tech@plant.test", "technician").await;
    let app = common::build_test_app(pool);

    let json = login(app, "tech@plant.test", &password).await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["email"], "tech@plant.test");
    assert_eq!(json["user"]["role"], "technician");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_rejects_wrong_password(pool: PgPool) {
    common::create_user(&pool, "user@plant.test", "viewer").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "user@plant.test", "password": "not the password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_rejects_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@plant.test", "password": "whatever" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_rejects_deactivated_account(pool: PgPool) {
    let (user, password) = common::create_user(&pool, "gone@plant.test", "operator").await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "gone@plant.test", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn five_failures_lock_the_account(pool: PgPool) {
    let (_, password) = common::create_user(&pool, "locked@plant.test", "technician").await;

    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "email": "locked@plant.test", "password": "wrong wrong" });
        let response = post_json(app, "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct password is refused while the lock holds.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "locked@plant.test", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    let (_, password) = common::create_user(&pool, "fresh@plant.test", "manager").await;
    let json = login(common::build_test_app(pool.clone()), "fresh@plant.test", &password).await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert!(refreshed["access_token"].is_string());

    // The old refresh token is single-use.
    let replay = post_json(common::build_test_app(pool), "/api/v1/auth/refresh", body).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    let (_, password) = common::create_user(&pool, "bye@plant.test", "viewer").await;
    let json = login(common::build_test_app(pool.clone()), "bye@plant.test", &password).await;
    let access = json["access_token"].as_str().unwrap().to_string();
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/logout",
        serde_json::json!({}),
        &access,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invite_can_be_redeemed_once(pool: PgPool) {
    let (_, admin_token) = common::auth_user(&pool, "admin@plant.test", "admin").await;

    let body = serde_json::json!({
        "email": "newhire@plant.test",
        "name": "New Hire",
        "role": "technician"
    });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/users",
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let invite = body_json(response).await;
    let token = invite["data"]["invite_token"].as_str().unwrap().to_string();

    // The invited account cannot log in before setting a password.
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "newhire@plant.test", "password": "anything at all" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/accept-invite",
        serde_json::json!({ "token": token, "password": "a long enough password 9" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "newhire@plant.test");

    // The token is consumed on redemption.
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/accept-invite",
        serde_json::json!({ "token": invite["data"]["invite_token"], "password": "another long password 9" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_passwords_are_rejected_on_invite_redemption(pool: PgPool) {
    let (_, admin_token) = common::auth_user(&pool, "admin@plant.test", "admin").await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/users",
        serde_json::json!({ "email": "weak@plant.test", "name": "Weak Pw", "role": "viewer" }),
        &admin_token,
    )
    .await;
    let invite = body_json(response).await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/accept-invite",
        serde_json::json!({ "token": invite["data"]["invite_token"], "password": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
