use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::fields::{array, pick_str, str_or};

/// Emergency ticket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergencyTicket {
    pub id: String,
    /// Display code: `emergency_code`, falling back to `id`
    pub code: String,
    pub emergency_code: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub impacted_asset_id: Option<String>,
    pub reporter_id: Option<String>,
    pub status: String,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Names of the impacted assets (`asset_name`, falling back to `id`)
    pub impacted_assets: Vec<String>,
}

impl EmergencyTicket {
    pub fn from_json(v: &Value) -> Self {
        let id = str_or(v, &["id"], "");
        let emergency_code = pick_str(v, &["emergency_code"]);
        Self {
            code: emergency_code.clone().unwrap_or_else(|| id.clone()),
            id,
            emergency_code,
            title: str_or(v, &["title"], ""),
            description: pick_str(v, &["description"]),
            impacted_asset_id: pick_str(v, &["impacted_asset_id"]),
            reporter_id: pick_str(v, &["reporter_id"]),
            status: str_or(v, &["status"], ""),
            note: pick_str(v, &["note"]),
            photo_url: pick_str(v, &["photo_url"]),
            created_at: pick_str(v, &["created_at"]),
            updated_at: pick_str(v, &["updated_at"]),
            impacted_assets: array(v, "emergency_impacted_assets")
                .iter()
                .filter_map(|a| pick_str(a, &["asset_name", "id"]))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_falls_back_to_id() {
        let t = EmergencyTicket::from_json(&json!({"id": 3, "title": "Fiber cut", "status": "Open"}));
        assert_eq!(t.code, "3");
        let t = EmergencyTicket::from_json(&json!({"id": 3, "emergency_code": "EMG-03"}));
        assert_eq!(t.code, "EMG-03");
    }

    #[test]
    fn test_impacted_assets() {
        let t = EmergencyTicket::from_json(&json!({
            "id": "1",
            "emergency_impacted_assets": [{"asset_name": "Router A"}, {"id": "A-2"}, {}]
        }));
        assert_eq!(t.impacted_assets, vec!["Router A".to_string(), "A-2".to_string()]);
    }
}
