//! Aggregated analytics payloads.

use serde::Serialize;

/// High-level operational counters for the dashboard and the chat
/// `get-analytics` tool.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsOverview {
    pub work_orders_pending: i64,
    pub work_orders_in_progress: i64,
    pub work_orders_completed: i64,
    pub work_orders_cancelled: i64,
    pub part_requests_pending: i64,
    pub parts_low_stock: i64,
    pub technicians_active: i64,
    pub schedules_due: i64,
}
