//! Integration tests for the work-order lifecycle.
//!
//! Exercises creation with part lines, the status state machine, the
//! approval gate, and the end-to-end stock invariant: after create,
//! complete, or cancel, the ledger and the part rows always agree.

use cmms_core::work_order::{
    LINE_CANCELLED, LINE_CONSUMED, LINE_RESERVED, STATUS_CANCELLED, STATUS_COMPLETED,
    STATUS_IN_PROGRESS, STATUS_PENDING,
};
use cmms_db::models::asset::CreateAsset;
use cmms_db::models::part::CreatePart;
use cmms_db::models::stock_movement::CreateStockMovement;
use cmms_db::models::technician::CreateTechnician;
use cmms_db::models::work_order::{
    CancelWorkOrder, CompleteWorkOrder, CreateWorkOrder, PartLineInput,
};
use cmms_db::repositories::{
    AssetRepo, PartRepo, StockMovementRepo, TechnicianRepo, UserRepo, WorkOrderRepo,
};
use cmms_db::FlowError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_asset(name: &str) -> CreateAsset {
    CreateAsset {
        name: name.to_string(),
        serial_number: None,
        status: None,
        parent_id: None,
        asset_type: None,
        location: None,
        manufacturer: None,
        model_number: None,
    }
}

fn new_part(reference: &str, unit_price: f64) -> CreatePart {
    CreatePart {
        reference: reference.to_string(),
        name: format!("Part {reference}"),
        category: None,
        unit_price: Some(unit_price),
        min_stock_level: None,
        supplier: None,
        location: None,
    }
}

fn new_order(asset_id: i64, parts: Vec<PartLineInput>) -> CreateWorkOrder {
    CreateWorkOrder {
        title: "Replace drive belt".to_string(),
        description: None,
        priority: None,
        order_type: None,
        asset_id,
        assigned_to: None,
        scheduled_at: None,
        estimated_duration_mins: Some(60),
        labor_cost: Some(80.0),
        requires_approval: None,
        parts,
    }
}

async fn stocked_part(pool: &PgPool, reference: &str, quantity: i32, unit_price: f64) -> i64 {
    let part = PartRepo::create(pool, &new_part(reference, unit_price))
        .await
        .unwrap();
    StockMovementRepo::apply(
        pool,
        part.id,
        None,
        &CreateStockMovement {
            movement_type: "in".to_string(),
            quantity,
            reason: Some("Initial stock".to_string()),
            reference: None,
        },
    )
    .await
    .unwrap();
    part.id
}

async fn approver(pool: &PgPool) -> i64 {
    UserRepo::create_with_password(pool, "manager@plant.test", "Manager", "manager", "x")
        .await
        .unwrap()
        .id
}

fn assert_validation(result: Result<impl std::fmt::Debug, FlowError>) {
    match result {
        Err(FlowError::Domain(cmms_core::error::CoreError::Validation(_))) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn create_without_parts_starts_pending(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();

    let order = WorkOrderRepo::create_with_parts(&pool, None, &new_order(asset.id, vec![]))
        .await
        .unwrap();
    assert_eq!(order.status, STATUS_PENDING);
    assert_eq!(order.priority, "medium");
    assert_eq!(order.material_cost, 0.0);
    assert_eq!(order.total_cost, 80.0);
}

#[sqlx::test]
async fn create_with_parts_reserves_stock_and_prices_lines(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let part_id = stocked_part(&pool, "BLT-100", 10, 12.5).await;

    let order = WorkOrderRepo::create_with_parts(
        &pool,
        None,
        &new_order(
            asset.id,
            vec![PartLineInput {
                part_id,
                quantity: 4,
                unit_price: None,
            }],
        ),
    )
    .await
    .unwrap();

    assert_eq!(order.material_cost, 50.0);
    assert_eq!(order.total_cost, 130.0);

    let part = PartRepo::find_by_id(&pool, part_id).await.unwrap().unwrap();
    assert_eq!(part.quantity_in_stock, 6);

    let lines = WorkOrderRepo::list_parts(&pool, order.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line_status, LINE_RESERVED);
    assert_eq!(lines[0].quantity_reserved, 4);
    assert_eq!(lines[0].unit_price, 12.5);

    let movements = StockMovementRepo::list_with_stock(&pool, part_id).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[1].movement.movement_type, "out");
    assert_eq!(
        movements[1].movement.reference.as_deref(),
        Some(format!("WO-{}", order.id).as_str())
    );
    assert_eq!(movements[1].stock_after, 6);
}

#[sqlx::test]
async fn create_fails_atomically_on_insufficient_stock(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let plenty = stocked_part(&pool, "BLT-100", 10, 5.0).await;
    let scarce = stocked_part(&pool, "BRG-200", 1, 30.0).await;

    let result = WorkOrderRepo::create_with_parts(
        &pool,
        None,
        &new_order(
            asset.id,
            vec![
                PartLineInput {
                    part_id: plenty,
                    quantity: 5,
                    unit_price: None,
                },
                PartLineInput {
                    part_id: scarce,
                    quantity: 3,
                    unit_price: None,
                },
            ],
        ),
    )
    .await;

    match result {
        Err(FlowError::Domain(cmms_core::error::CoreError::InsufficientStock {
            available,
            requested,
            ..
        })) => {
            assert_eq!(available, 1);
            assert_eq!(requested, 3);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Nothing committed: the first line's stock is untouched too.
    let part = PartRepo::find_by_id(&pool, plenty).await.unwrap().unwrap();
    assert_eq!(part.quantity_in_stock, 10);
    let orders = WorkOrderRepo::list(&pool, &Default::default()).await.unwrap();
    assert!(orders.is_empty());
}

#[sqlx::test]
async fn create_rejects_short_title_and_missing_asset(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();

    let mut input = new_order(asset.id, vec![]);
    input.title = "ab".to_string();
    assert_validation(WorkOrderRepo::create_with_parts(&pool, None, &input).await);

    let missing = new_order(9999, vec![]);
    match WorkOrderRepo::create_with_parts(&pool, None, &missing).await {
        Err(FlowError::Domain(cmms_core::error::CoreError::NotFound { entity, .. })) => {
            assert_eq!(entity, "Asset");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[sqlx::test]
async fn create_rejects_inactive_technician(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let tech = TechnicianRepo::create(
        &pool,
        &CreateTechnician {
            name: "Alex Grant".to_string(),
            email: "alex@example.com".to_string(),
            phone: None,
            skills: vec!["mechanical".to_string()],
        },
    )
    .await
    .unwrap();
    TechnicianRepo::deactivate(&pool, tech.id).await.unwrap();

    let mut input = new_order(asset.id, vec![]);
    input.assigned_to = Some(tech.id);
    assert_validation(WorkOrderRepo::create_with_parts(&pool, None, &input).await);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn start_then_complete_marks_consumption_without_second_deduction(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let part_id = stocked_part(&pool, "BLT-100", 10, 12.5).await;

    let order = WorkOrderRepo::create_with_parts(
        &pool,
        None,
        &new_order(
            asset.id,
            vec![PartLineInput {
                part_id,
                quantity: 4,
                unit_price: None,
            }],
        ),
    )
    .await
    .unwrap();

    let started = WorkOrderRepo::start(&pool, order.id).await.unwrap();
    assert_eq!(started.status, STATUS_IN_PROGRESS);
    assert!(started.started_at.is_some());

    let completed = WorkOrderRepo::complete(
        &pool,
        order.id,
        &CompleteWorkOrder {
            actual_duration_mins: Some(45),
        },
    )
    .await
    .unwrap();
    assert_eq!(completed.status, STATUS_COMPLETED);
    assert!(completed.completed_at.is_some());
    assert_eq!(completed.actual_duration_mins, Some(45));

    // Stock was deducted once, at creation.
    let part = PartRepo::find_by_id(&pool, part_id).await.unwrap().unwrap();
    assert_eq!(part.quantity_in_stock, 6);

    let lines = WorkOrderRepo::list_parts(&pool, order.id).await.unwrap();
    assert_eq!(lines[0].line_status, LINE_CONSUMED);
    assert_eq!(lines[0].quantity_consumed, 4);
    assert_eq!(lines[0].quantity_reserved, 0);
}

#[sqlx::test]
async fn pending_order_can_complete_directly(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let order = WorkOrderRepo::create_with_parts(&pool, None, &new_order(asset.id, vec![]))
        .await
        .unwrap();

    let completed = WorkOrderRepo::complete(
        &pool,
        order.id,
        &CompleteWorkOrder {
            actual_duration_mins: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(completed.status, STATUS_COMPLETED);
}

#[sqlx::test]
async fn cancellation_returns_reserved_stock(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let part_id = stocked_part(&pool, "BLT-100", 10, 12.5).await;

    let order = WorkOrderRepo::create_with_parts(
        &pool,
        None,
        &new_order(
            asset.id,
            vec![PartLineInput {
                part_id,
                quantity: 4,
                unit_price: None,
            }],
        ),
    )
    .await
    .unwrap();

    let cancelled = WorkOrderRepo::cancel(
        &pool,
        order.id,
        &CancelWorkOrder {
            reason: Some("Asset decommissioned".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(cancelled.status, STATUS_CANCELLED);
    assert_eq!(
        cancelled.cancellation_reason.as_deref(),
        Some("Asset decommissioned")
    );

    let part = PartRepo::find_by_id(&pool, part_id).await.unwrap().unwrap();
    assert_eq!(part.quantity_in_stock, 10);

    let lines = WorkOrderRepo::list_parts(&pool, order.id).await.unwrap();
    assert_eq!(lines[0].line_status, LINE_CANCELLED);
    assert_eq!(lines[0].quantity_reserved, 0);

    // Ledger shows the out and the compensating in.
    let movements = StockMovementRepo::list_with_stock(&pool, part_id).await.unwrap();
    assert_eq!(movements.len(), 3);
    assert_eq!(movements[2].movement.movement_type, "in");
    assert_eq!(movements[2].stock_after, 10);
}

#[sqlx::test]
async fn terminal_orders_reject_further_transitions(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let order = WorkOrderRepo::create_with_parts(&pool, None, &new_order(asset.id, vec![]))
        .await
        .unwrap();

    WorkOrderRepo::complete(
        &pool,
        order.id,
        &CompleteWorkOrder {
            actual_duration_mins: None,
        },
    )
    .await
    .unwrap();

    match WorkOrderRepo::cancel(&pool, order.id, &CancelWorkOrder { reason: None }).await {
        Err(FlowError::Domain(cmms_core::error::CoreError::InvalidTransition {
            from, to, ..
        })) => {
            assert_eq!(from, STATUS_COMPLETED);
            assert_eq!(to, STATUS_CANCELLED);
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }

    match WorkOrderRepo::start(&pool, order.id).await {
        Err(FlowError::Domain(cmms_core::error::CoreError::InvalidTransition { .. })) => {}
        other => panic!("expected InvalidTransition, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Approval gate
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn approval_records_decision_metadata(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let mut input = new_order(asset.id, vec![]);
    input.requires_approval = Some(true);
    let order = WorkOrderRepo::create_with_parts(&pool, None, &input).await.unwrap();

    let approver_id = approver(&pool).await;
    let approved = WorkOrderRepo::approve(&pool, order.id, approver_id)
        .await
        .unwrap();
    assert_eq!(approved.approved_by, Some(approver_id));
    assert!(approved.approved_at.is_some());
    assert_eq!(approved.status, STATUS_PENDING);
}

#[sqlx::test]
async fn rejection_cancels_and_returns_stock(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let part_id = stocked_part(&pool, "BLT-100", 10, 12.5).await;
    let mut input = new_order(
        asset.id,
        vec![PartLineInput {
            part_id,
            quantity: 2,
            unit_price: None,
        }],
    );
    input.requires_approval = Some(true);
    let order = WorkOrderRepo::create_with_parts(&pool, None, &input).await.unwrap();

    let rejected = WorkOrderRepo::reject(&pool, order.id, "Budget exhausted").await.unwrap();
    assert_eq!(rejected.status, STATUS_CANCELLED);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Budget exhausted"));

    let part = PartRepo::find_by_id(&pool, part_id).await.unwrap().unwrap();
    assert_eq!(part.quantity_in_stock, 10);
}

#[sqlx::test]
async fn approval_requires_the_flag(pool: PgPool) {
    let asset = AssetRepo::create(&pool, &new_asset("Conveyor A")).await.unwrap();
    let order = WorkOrderRepo::create_with_parts(&pool, None, &new_order(asset.id, vec![]))
        .await
        .unwrap();

    let approver_id = approver(&pool).await;
    match WorkOrderRepo::approve(&pool, order.id, approver_id).await {
        Err(FlowError::Domain(cmms_core::error::CoreError::Conflict(_))) => {}
        other => panic!("expected Conflict, got {other:?}"),
    }
}
