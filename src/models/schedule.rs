use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::fields::str_or;

/// Planned patch window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchSchedule {
    pub id: String,
    pub patch_id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub assignee: String,
    /// `Upcoming` when the API omits it
    pub status: String,
}

impl PatchSchedule {
    pub fn from_json(v: &Value) -> Self {
        Self {
            id: str_or(v, &["id", "schedule_id"], ""),
            patch_id: str_or(v, &["patch_id", "job_id", "patch_job_id"], ""),
            title: str_or(v, &["title", "name", "scope_asset"], ""),
            date: str_or(v, &["schedule_at", "date", "scheduled_date"], ""),
            time: str_or(v, &["time", "scheduled_time"], ""),
            assignee: str_or(v, &["technician_name", "assignee", "technician"], ""),
            status: str_or(v, &["status"], "Upcoming"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_fallbacks() {
        let s = PatchSchedule::from_json(&json!({
            "schedule_id": "S1",
            "patch_job_id": "PJ-1",
            "scope_asset": "Web servers",
            "scheduled_date": "2026-02-01",
            "technician": "Andi"
        }));
        assert_eq!(s.id, "S1");
        assert_eq!(s.patch_id, "PJ-1");
        assert_eq!(s.title, "Web servers");
        assert_eq!(s.date, "2026-02-01");
        assert_eq!(s.assignee, "Andi");
        assert_eq!(s.status, "Upcoming");
    }
}
