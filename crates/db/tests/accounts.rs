//! Integration tests for user accounts and refresh sessions.

use chrono::{Duration, Utc};
use cmms_core::error::CoreError;
use cmms_db::models::session::CreateSession;
use cmms_db::models::user::{CreateUser, UpdateUser};
use cmms_db::repositories::{SessionRepo, UserRepo};
use cmms_db::FlowError;
use sqlx::PgPool;

fn invite(email: &str, role: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        name: "Jordan Birch".to_string(),
        role: role.to_string(),
    }
}

#[sqlx::test]
async fn invited_user_has_no_password_until_redeemed(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(48);
    let user = UserRepo::create_invited(&pool, &invite("jordan@example.com", "technician"), "tok-1", expires)
        .await
        .unwrap();
    assert!(user.password_hash.is_none());
    assert_eq!(user.role, "technician");

    let found = UserRepo::find_by_invite_token(&pool, "tok-1").await.unwrap();
    assert!(found.is_some());

    assert!(UserRepo::set_password(&pool, user.id, "argon2-hash").await.unwrap());
    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.password_hash.as_deref(), Some("argon2-hash"));
    assert!(user.invite_token.is_none());

    // The redeemed token no longer resolves.
    let found = UserRepo::find_by_invite_token(&pool, "tok-1").await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test]
async fn emails_are_stored_and_looked_up_lowercased(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(48);
    let user = UserRepo::create_invited(&pool, &invite("Jordan@Example.COM", "viewer"), "tok-2", expires)
        .await
        .unwrap();
    assert_eq!(user.email, "jordan@example.com");

    let found = UserRepo::find_by_email(&pool, "JORDAN@example.com").await.unwrap();
    assert!(found.is_some());
}

#[sqlx::test]
async fn duplicate_emails_are_rejected(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(48);
    UserRepo::create_invited(&pool, &invite("jordan@example.com", "viewer"), "tok-3", expires)
        .await
        .unwrap();

    match UserRepo::create_invited(&pool, &invite("jordan@example.com", "viewer"), "tok-4", expires)
        .await
    {
        Err(FlowError::Database(sqlx::Error::Database(db_err))) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test]
async fn invalid_roles_are_rejected(pool: PgPool) {
    let expires = Utc::now() + Duration::hours(48);
    match UserRepo::create_invited(&pool, &invite("x@example.com", "superuser"), "tok-5", expires)
        .await
    {
        Err(FlowError::Domain(CoreError::Validation(_))) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[sqlx::test]
async fn login_bookkeeping_roundtrip(pool: PgPool) {
    let user = UserRepo::create_with_password(
        &pool,
        "ops@example.com",
        "Ops Admin",
        "admin",
        "argon2-hash",
    )
    .await
    .unwrap();

    for _ in 0..3 {
        UserRepo::increment_failed_login(&pool, user.id).await.unwrap();
    }
    UserRepo::lock_account(&pool, user.id, Utc::now() + Duration::minutes(15))
        .await
        .unwrap();

    let locked = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(locked.failed_login_count, 3);
    assert!(locked.locked_until.is_some());

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.failed_login_count, 0);
    assert!(user.locked_until.is_none());
    assert!(user.last_login_at.is_some());
}

#[sqlx::test]
async fn role_update_and_deactivation(pool: PgPool) {
    let user = UserRepo::create_with_password(&pool, "t@example.com", "Tess Reed", "viewer", "h")
        .await
        .unwrap();

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            name: None,
            role: Some("manager".to_string()),
            is_active: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.role, "manager");

    assert!(UserRepo::deactivate(&pool, user.id).await.unwrap());
    assert!(!UserRepo::deactivate(&pool, user.id).await.unwrap());
}

#[sqlx::test]
async fn sessions_resolve_only_while_active(pool: PgPool) {
    let user = UserRepo::create_with_password(&pool, "s@example.com", "Sam Hale", "admin", "h")
        .await
        .unwrap();

    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "hash-1".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            user_agent: None,
            ip_address: None,
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "hash-1")
        .await
        .unwrap()
        .is_some());

    assert!(SessionRepo::revoke(&pool, session.id).await.unwrap());
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "hash-1")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn revoke_all_counts_only_active_sessions(pool: PgPool) {
    let user = UserRepo::create_with_password(&pool, "s@example.com", "Sam Hale", "admin", "h")
        .await
        .unwrap();

    for hash in ["h1", "h2", "h3"] {
        SessionRepo::create(
            &pool,
            &CreateSession {
                user_id: user.id,
                refresh_token_hash: hash.to_string(),
                expires_at: Utc::now() + Duration::days(7),
                user_agent: None,
                ip_address: None,
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 3);
    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 0);
}
