use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::fields::{array, count, str_or};

/// Headline counters for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_today: i64,
    pub pending_inspection: i64,
    pub approved_waiting_schedule: i64,
    pub today_schedules: i64,
}

impl DashboardSummary {
    pub fn from_json(v: &Value) -> Self {
        Self {
            total_today: count(v, "total_today"),
            pending_inspection: count(v, "pending_inspection"),
            approved_waiting_schedule: count(v, "approved_waiting_schedule"),
            today_schedules: count(v, "today_schedules"),
        }
    }
}

/// One day of the weekly activity trend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrendPoint {
    pub date: String,
    pub day: String,
    pub submitted: i64,
    pub inspected: i64,
    pub implemented: i64,
}

impl WeeklyTrendPoint {
    pub fn from_json(v: &Value) -> Self {
        Self {
            date: str_or(v, &["date"], ""),
            day: str_or(v, &["day"], ""),
            submitted: count(v, "submitted"),
            inspected: count(v, "inspected"),
            implemented: count(v, "implemented"),
        }
    }

    /// Trend points live under `trend` inside the envelope payload.
    pub fn list_from_json(v: &Value) -> Vec<Self> {
        array(v, "trend").iter().map(Self::from_json).collect()
    }
}
