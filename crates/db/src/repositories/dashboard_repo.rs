//! Aggregated analytics queries for the dashboard and the chat tools.

use sqlx::PgPool;

use crate::models::dashboard::AnalyticsOverview;

/// Provides read-only aggregate counters.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Collect the operational overview in a single round-trip.
    pub async fn overview(pool: &PgPool) -> Result<AnalyticsOverview, sqlx::Error> {
        let row: (i64, i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM work_orders WHERE status = 'pending'),
                (SELECT COUNT(*) FROM work_orders WHERE status = 'in_progress'),
                (SELECT COUNT(*) FROM work_orders WHERE status = 'completed'),
                (SELECT COUNT(*) FROM work_orders WHERE status = 'cancelled'),
                (SELECT COUNT(*) FROM part_requests WHERE status = 'pending'),
                (SELECT COUNT(*) FROM parts WHERE quantity_in_stock <= min_stock_level),
                (SELECT COUNT(*) FROM technicians WHERE is_active = true),
                (SELECT COUNT(*) FROM maintenance_schedules
                  WHERE is_active = true
                    AND ((trigger_type = 'time_based' AND next_due_at <= NOW())
                      OR (trigger_type = 'threshold_based' AND current_value >= threshold_value)))",
        )
        .fetch_one(pool)
        .await?;

        Ok(AnalyticsOverview {
            work_orders_pending: row.0,
            work_orders_in_progress: row.1,
            work_orders_completed: row.2,
            work_orders_cancelled: row.3,
            part_requests_pending: row.4,
            parts_low_stock: row.5,
            technicians_active: row.6,
            schedules_due: row.7,
        })
    }
}
