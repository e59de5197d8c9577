//! Route tree for the API.

pub mod admin;
pub mod analytics;
pub mod assets;
pub mod auth;
pub mod chat;
pub mod configuration;
pub mod health;
pub mod part_requests;
pub mod parts;
pub mod schedules;
pub mod technicians;
pub mod work_orders;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout
/// /auth/accept-invite                redeem an invite token (public)
/// /auth/change-password              change own password
///
/// /admin/users                       list, invite (admin only)
/// /admin/users/{id}                  get, update, deactivate
/// /admin/users/{id}/reset-password   reset password
///
/// /assets                            list, create
/// /assets/{id}                       get, update, delete
/// /assets/{id}/children              child assets
///
/// /parts                             list, create
/// /parts/low-stock                   parts at or below minimum stock
/// /parts/{id}                        get, update, delete
/// /parts/{id}/movements              history with stock levels, manual adjustment
///
/// /technicians                       list (?skill=), create
/// /technicians/{id}                  get, update, deactivate
///
/// /work-orders                       list (filters), create with part lines
/// /work-orders/{id}                  get, update
/// /work-orders/{id}/parts            attached part lines
/// /work-orders/{id}/start            pending -> in_progress
/// /work-orders/{id}/complete         -> completed, lines consumed
/// /work-orders/{id}/cancel           -> cancelled, stock returned
/// /work-orders/{id}/approve          approval decision (manager)
/// /work-orders/{id}/reject           rejection + cancellation (manager)
///
/// /schedules                         list, create
/// /schedules/due                     due schedules
/// /schedules/{id}                    get, update, delete
/// /schedules/{id}/readings           record metric reading
/// /schedules/{id}/execute            spawn work order, advance trigger (manager)
///
/// /part-requests                     list (?status=), create
/// /part-requests/mine                caller's own requests
/// /part-requests/{id}                get
/// /part-requests/{id}/approve        reserve stock (manager)
/// /part-requests/{id}/reject         reject with reason (manager)
/// /part-requests/{id}/deliver        consume reservation (manager)
/// /part-requests/{id}/cancel         cancel, releasing any reservation
///
/// /config/categories                 list, create (manager)
/// /config/categories/{code}/items    list, create (manager)
/// /config/items/{id}                 update, delete (manager)
///
/// /analytics/overview                aggregate counts
///
/// /chat                              chat assistant (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout, invites).
        .nest("/auth", auth::router())
        // Admin user management.
        .nest("/admin", admin::router())
        // Asset registry.
        .nest("/assets", assets::router())
        // Spare parts and the stock-movement ledger.
        .nest("/parts", parts::router())
        // Technician roster.
        .nest("/technicians", technicians::router())
        // Work-order lifecycle.
        .nest("/work-orders", work_orders::router())
        // Preventive/predictive maintenance schedules.
        .nest("/schedules", schedules::router())
        // Part-request approval and delivery.
        .nest("/part-requests", part_requests::router())
        // Configuration taxonomy.
        .nest("/config", configuration::router())
        // Aggregate analytics.
        .nest("/analytics", analytics::router())
        // Chat assistant.
        .nest("/chat", chat::router())
}
