//! Integration tests for parts and the stock-movement ledger.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

fn app(pool: &PgPool) -> Router {
    common::build_test_app(pool.clone())
}

#[sqlx::test(migrations = "../db/migrations")]
async fn part_creation_is_manager_gated(pool: PgPool) {
    let (_, viewer) = common::auth_user(&pool, "viewer@plant.test", "viewer").await;

    let response = post_json_auth(
        app(&pool),
        "/api/v1/parts",
        serde_json::json!({ "reference": "flt-001", "name": "Oil filter" }),
        &viewer,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_references_conflict(pool: PgPool) {
    let (_, manager) = common::auth_user(&pool, "manager@plant.test", "manager").await;

    let body = serde_json::json!({ "reference": "FLT-001", "name": "Oil filter" });
    let response = post_json_auth(app(&pool), "/api/v1/parts", body.clone(), &manager).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // References are normalized to upper case, so the lower-case twin collides.
    let response = post_json_auth(
        app(&pool),
        "/api/v1/parts",
        serde_json::json!({ "reference": "flt-001", "name": "Oil filter again" }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn movements_build_a_history_with_stock_levels(pool: PgPool) {
    let (_, manager) = common::auth_user(&pool, "manager@plant.test", "manager").await;

    let response = post_json_auth(
        app(&pool),
        "/api/v1/parts",
        serde_json::json!({ "reference": "SEAL-9", "name": "Shaft seal" }),
        &manager,
    )
    .await;
    let part_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    for (movement_type, quantity) in [("in", 10), ("out", 3), ("in", 5)] {
        let response = post_json_auth(
            app(&pool),
            &format!("/api/v1/parts/{part_id}/movements"),
            serde_json::json!({ "movement_type": movement_type, "quantity": quantity }),
            &manager,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(
        app(&pool),
        &format!("/api/v1/parts/{part_id}/movements"),
        &manager,
    )
    .await;
    let movements = body_json(response).await["data"].clone();
    let levels: Vec<i64> = movements
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["stock_after"].as_i64().unwrap())
        .collect();
    assert_eq!(levels, vec![10, 7, 12]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overdraw_is_rejected(pool: PgPool) {
    let (_, manager) = common::auth_user(&pool, "manager@plant.test", "manager").await;

    let response = post_json_auth(
        app(&pool),
        "/api/v1/parts",
        serde_json::json!({ "reference": "HOSE-2", "name": "Hydraulic hose" }),
        &manager,
    )
    .await;
    let part_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app(&pool),
        &format!("/api/v1/parts/{part_id}/movements"),
        serde_json::json!({ "movement_type": "out", "quantity": 1 }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INSUFFICIENT_STOCK");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_never_touches_stock(pool: PgPool) {
    let (_, manager) = common::auth_user(&pool, "manager@plant.test", "manager").await;

    let response = post_json_auth(
        app(&pool),
        "/api/v1/parts",
        serde_json::json!({ "reference": "BELT-5", "name": "Drive belt" }),
        &manager,
    )
    .await;
    let part_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    post_json_auth(
        app(&pool),
        &format!("/api/v1/parts/{part_id}/movements"),
        serde_json::json!({ "movement_type": "in", "quantity": 4 }),
        &manager,
    )
    .await;

    let response = put_json_auth(
        app(&pool),
        &format!("/api/v1/parts/{part_id}"),
        serde_json::json!({ "name": "Drive belt XL", "unit_price": 9.5 }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let part = body_json(response).await["data"].clone();
    assert_eq!(part["name"], "Drive belt XL");
    assert_eq!(part["quantity_in_stock"], 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn low_stock_listing_flags_depleted_parts(pool: PgPool) {
    let (_, manager) = common::auth_user(&pool, "manager@plant.test", "manager").await;

    let response = post_json_auth(
        app(&pool),
        "/api/v1/parts",
        serde_json::json!({ "reference": "LOW-1", "name": "Grease cartridge", "min_stock_level": 5 }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app(&pool), "/api/v1/parts/low-stock", &manager).await;
    let parts = body_json(response).await["data"].clone();
    assert_eq!(parts.as_array().unwrap().len(), 1);
    assert_eq!(parts[0]["reference"], "LOW-1");
}
