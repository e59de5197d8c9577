//! Integration tests for maintenance schedules: readings, due listing,
//! and execution.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, get_auth, post_json_auth};
use sqlx::PgPool;

fn app(pool: &PgPool) -> Router {
    common::build_test_app(pool.clone())
}

async fn seed_asset(pool: &PgPool, token: &str) -> i64 {
    let response = post_json_auth(
        app(pool),
        "/api/v1/assets",
        serde_json::json!({ "name": "Compressor B" }),
        token,
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn time_based_schedules_need_an_interval(pool: PgPool) {
    let (_, manager) = common::auth_user(&pool, "manager@plant.test", "manager").await;
    let asset_id = seed_asset(&pool, &manager).await;

    let response = post_json_auth(
        app(&pool),
        "/api/v1/schedules",
        serde_json::json!({
            "name": "Quarterly service",
            "asset_id": asset_id,
            "trigger_type": "time_based"
        }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app(&pool),
        "/api/v1/schedules",
        serde_json::json!({
            "name": "Quarterly service",
            "asset_id": asset_id,
            "trigger_type": "time_based",
            "interval_days": 90
        }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let schedule = body_json(response).await["data"].clone();
    assert_eq!(schedule["maintenance_type"], "preventive");
    assert!(schedule["next_due_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn readings_flag_a_reached_threshold(pool: PgPool) {
    let (_, manager) = common::auth_user(&pool, "manager@plant.test", "manager").await;
    let (_, operator) = common::auth_user(&pool, "op@plant.test", "operator").await;
    let asset_id = seed_asset(&pool, &manager).await;

    let response = post_json_auth(
        app(&pool),
        "/api/v1/schedules",
        serde_json::json!({
            "name": "Hour meter",
            "asset_id": asset_id,
            "trigger_type": "threshold_based",
            "metric_name": "operating_hours",
            "threshold_value": 500.0,
            "unit": "h"
        }),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let schedule = body_json(response).await["data"].clone();
    assert_eq!(schedule["maintenance_type"], "predictive");
    let schedule_id = schedule["id"].as_i64().unwrap();

    // Operators can record readings.
    let response = post_json_auth(
        app(&pool),
        &format!("/api/v1/schedules/{schedule_id}/readings"),
        serde_json::json!({ "value": 420.0 }),
        &operator,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["threshold_reached"], false);

    let response = post_json_auth(
        app(&pool),
        &format!("/api/v1/schedules/{schedule_id}/readings"),
        serde_json::json!({ "value": 505.0 }),
        &operator,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["threshold_reached"], true);

    let response = get_auth(app(&pool), "/api/v1/schedules/due", &manager).await;
    let due = body_json(response).await["data"].clone();
    assert_eq!(due.as_array().unwrap().len(), 1);
    assert_eq!(due[0]["id"], schedule_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn execution_spawns_a_work_order_and_resets_the_counter(pool: PgPool) {
    let (_, manager) = common::auth_user(&pool, "manager@plant.test", "manager").await;
    let (_, technician) = common::auth_user(&pool, "tech@plant.test", "technician").await;
    let asset_id = seed_asset(&pool, &manager).await;

    let response = post_json_auth(
        app(&pool),
        "/api/v1/schedules",
        serde_json::json!({
            "name": "Hour meter",
            "asset_id": asset_id,
            "trigger_type": "threshold_based",
            "metric_name": "operating_hours",
            "threshold_value": 500.0,
            "unit": "h"
        }),
        &manager,
    )
    .await;
    let schedule_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    post_json_auth(
        app(&pool),
        &format!("/api/v1/schedules/{schedule_id}/readings"),
        serde_json::json!({ "value": 505.0 }),
        &manager,
    )
    .await;

    // Execution is manager-gated.
    let response = post_json_auth(
        app(&pool),
        &format!("/api/v1/schedules/{schedule_id}/execute"),
        serde_json::json!({}),
        &technician,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app(&pool),
        &format!("/api/v1/schedules/{schedule_id}/execute"),
        serde_json::json!({}),
        &manager,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await["data"].clone();
    assert_eq!(order["title"], "[Maintenance Prédictive] Hour meter");
    assert_eq!(order["order_type"], "predictive");
    assert_eq!(order["schedule_id"], schedule_id);
    let description = order["description"].as_str().unwrap();
    assert!(description.contains("Seuil atteint : 505/500 h (operating_hours)"));

    let response = get_auth(
        app(&pool),
        &format!("/api/v1/schedules/{schedule_id}"),
        &manager,
    )
    .await;
    let schedule = body_json(response).await["data"].clone();
    assert_eq!(schedule["current_value"], 0.0);
    assert!(schedule["last_executed_at"].is_string());
}
