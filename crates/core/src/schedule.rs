//! Maintenance schedule trigger rules.
//!
//! A schedule spawns work orders either on a fixed time cadence or when a
//! running metric counter crosses a threshold. Executing a schedule derives
//! the work order's title, type, and description from the trigger, then
//! advances the trigger state (next due date, or counter reset).

use chrono::Duration;

use crate::types::Timestamp;
use crate::work_order::{TYPE_PREDICTIVE, TYPE_PREVENTIVE};

pub const TRIGGER_TIME_BASED: &str = "time_based";
pub const TRIGGER_THRESHOLD_BASED: &str = "threshold_based";

/// All valid trigger types.
pub const VALID_TRIGGER_TYPES: &[&str] = &[TRIGGER_TIME_BASED, TRIGGER_THRESHOLD_BASED];

/// Generated work-order title prefixes. These are product copy, fixed by the
/// planning teams, and intentionally not localized here.
pub const TITLE_PREFIX_PREVENTIVE: &str = "[Maintenance Préventive] ";
pub const TITLE_PREFIX_PREDICTIVE: &str = "[Maintenance Prédictive] ";

/// Validate a trigger type string.
pub fn validate_trigger_type(trigger_type: &str) -> Result<(), String> {
    if VALID_TRIGGER_TYPES.contains(&trigger_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid trigger type '{trigger_type}'. Must be one of: {}",
            VALID_TRIGGER_TYPES.join(", ")
        ))
    }
}

/// Work-order type spawned by a schedule: time-based schedules emit
/// preventive orders, threshold-based schedules emit predictive ones.
pub fn spawned_order_type(trigger_type: &str) -> &'static str {
    match trigger_type {
        TRIGGER_THRESHOLD_BASED => TYPE_PREDICTIVE,
        _ => TYPE_PREVENTIVE,
    }
}

/// Title of the work order spawned by an execution.
pub fn spawned_title(trigger_type: &str, schedule_name: &str) -> String {
    let prefix = match trigger_type {
        TRIGGER_THRESHOLD_BASED => TITLE_PREFIX_PREDICTIVE,
        _ => TITLE_PREFIX_PREVENTIVE,
    };
    format!("{prefix}{schedule_name}")
}

/// Description of the spawned work order. Threshold executions append the
/// reading that tripped the trigger.
pub fn spawned_description(
    trigger_type: &str,
    base_description: Option<&str>,
    metric_name: Option<&str>,
    current_value: Option<f64>,
    threshold_value: Option<f64>,
    unit: Option<&str>,
) -> String {
    let base = base_description.unwrap_or("").to_string();
    if trigger_type != TRIGGER_THRESHOLD_BASED {
        return base;
    }
    let detail = format!(
        "Seuil atteint : {}/{} {} ({})",
        current_value.unwrap_or(0.0),
        threshold_value.unwrap_or(0.0),
        unit.unwrap_or(""),
        metric_name.unwrap_or("")
    );
    if base.is_empty() {
        detail
    } else {
        format!("{base}\n{detail}")
    }
}

/// Next due date for a time-based schedule, anchored on the execution time so
/// an overdue schedule does not immediately re-trigger.
pub fn next_due_after(executed_at: Timestamp, interval_days: i32) -> Timestamp {
    executed_at + Duration::days(i64::from(interval_days))
}

/// Whether a threshold-based schedule's counter has reached its trigger value.
pub fn threshold_reached(current_value: f64, threshold_value: f64) -> bool {
    current_value >= threshold_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn time_based_spawns_preventive() {
        assert_eq!(spawned_order_type(TRIGGER_TIME_BASED), TYPE_PREVENTIVE);
    }

    #[test]
    fn threshold_based_spawns_predictive() {
        assert_eq!(spawned_order_type(TRIGGER_THRESHOLD_BASED), TYPE_PREDICTIVE);
    }

    #[test]
    fn preventive_title_prefix() {
        assert_eq!(
            spawned_title(TRIGGER_TIME_BASED, "Graissage pompe P1"),
            "[Maintenance Préventive] Graissage pompe P1"
        );
    }

    #[test]
    fn predictive_title_prefix() {
        assert_eq!(
            spawned_title(TRIGGER_THRESHOLD_BASED, "Vibration moteur M3"),
            "[Maintenance Prédictive] Vibration moteur M3"
        );
    }

    #[test]
    fn threshold_description_appends_reading() {
        let desc = spawned_description(
            TRIGGER_THRESHOLD_BASED,
            Some("Inspect bearings"),
            Some("vibration"),
            Some(12.5),
            Some(10.0),
            Some("mm/s"),
        );
        assert_eq!(desc, "Inspect bearings\nSeuil atteint : 12.5/10 mm/s (vibration)");
    }

    #[test]
    fn threshold_description_without_base() {
        let desc = spawned_description(
            TRIGGER_THRESHOLD_BASED,
            None,
            Some("running_hours"),
            Some(500.0),
            Some(500.0),
            Some("h"),
        );
        assert_eq!(desc, "Seuil atteint : 500/500 h (running_hours)");
    }

    #[test]
    fn time_based_description_unchanged() {
        let desc = spawned_description(TRIGGER_TIME_BASED, Some("Routine check"), None, None, None, None);
        assert_eq!(desc, "Routine check");
    }

    #[test]
    fn next_due_anchored_on_execution() {
        let executed = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let due = next_due_after(executed, 30);
        assert_eq!(due, Utc.with_ymd_and_hms(2026, 3, 31, 8, 0, 0).unwrap());
    }

    #[test]
    fn threshold_reached_at_equality() {
        assert!(threshold_reached(10.0, 10.0));
        assert!(!threshold_reached(9.9, 10.0));
    }

    #[test]
    fn invalid_trigger_type_rejected() {
        assert!(validate_trigger_type("usage_based").is_err());
    }
}
