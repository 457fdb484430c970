use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::fields::{pick_f64, pick_str, str_or};
use crate::models::ChangeType;

/// Approval statuses that still accept a decision
pub const OPEN_APPROVAL_STATUSES: &[&str] = &["PENDING", "NEED APPROVAL"];

/// Change request statuses that count as a finished result (uppercase)
pub const RESULT_STATUSES: &[&str] = &["COMPLETED", "FAILED", "ENDED"];

/// Change request, normalized from the API record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// Display identifier: `cr_id`, falling back to `id`
    pub id: String,
    pub cr_id: Option<String>,
    pub record_id: Option<String>,
    pub tiket_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub approval_status: String,
    /// Lowercased change type (`minor`, `standard`, `major`), empty when absent
    pub change_type: String,
    pub risk_score: Option<f64>,
    pub risk_level: Option<String>,
    pub skor_dampak: Option<f64>,
    pub skor_kemungkinan: Option<f64>,
    pub skor_exposure: Option<f64>,
    pub dinas: Option<String>,
    pub asset_id: Option<String>,
    pub impacted_asset_id: Option<String>,
    pub ci_id: Option<String>,
    pub katalog_permintaan: Option<String>,
    pub source: Option<String>,
    pub alasan: Option<String>,
    pub tujuan: Option<String>,
    pub rencana_implementasi: Option<String>,
    pub usulan_jadwal: Option<String>,
    pub estimasi_biaya: Option<String>,
    pub estimasi_waktu: Option<String>,
    pub rencana_rollback: Option<String>,
    pub impact_desc: Option<String>,
    pub control_existing: Option<String>,
    pub control_effectiveness: Option<String>,
    pub mitigation_plan: Option<String>,
    pub schedule_start: Option<String>,
    pub schedule_end: Option<String>,
    pub pic_implementation: Option<String>,
    pub created_at: Option<String>,
}

impl ChangeRequest {
    pub fn from_json(v: &Value) -> Self {
        let cr_id = pick_str(v, &["cr_id"]);
        let record_id = pick_str(v, &["id"]);
        Self {
            id: cr_id.clone().or_else(|| record_id.clone()).unwrap_or_default(),
            cr_id,
            record_id,
            tiket_id: pick_str(v, &["tiket_id"]),
            title: str_or(v, &["title"], ""),
            description: pick_str(v, &["description"]),
            status: str_or(v, &["status"], ""),
            approval_status: str_or(v, &["approval_status"], ""),
            change_type: str_or(v, &["type"], "").to_lowercase(),
            risk_score: pick_f64(v, &["risk_score"]),
            risk_level: pick_str(v, &["risk_level"]),
            skor_dampak: pick_f64(v, &["skor_dampak"]),
            skor_kemungkinan: pick_f64(v, &["skor_kemungkinan"]),
            skor_exposure: pick_f64(v, &["skor_exposure"]),
            dinas: pick_str(v, &["dinas"]),
            asset_id: pick_str(v, &["asset_id", "impacted_asset_id"]),
            impacted_asset_id: pick_str(v, &["impacted_asset_id"]),
            ci_id: pick_str(v, &["ci_id"]),
            katalog_permintaan: pick_str(v, &["katalog_permintaan"]),
            source: pick_str(v, &["source"]),
            alasan: pick_str(v, &["alasan"]),
            tujuan: pick_str(v, &["tujuan"]),
            rencana_implementasi: pick_str(v, &["rencana_implementasi"]),
            usulan_jadwal: pick_str(v, &["usulan_jadwal"]),
            estimasi_biaya: pick_str(v, &["estimasi_biaya"]),
            estimasi_waktu: pick_str(v, &["estimasi_waktu"]),
            rencana_rollback: pick_str(v, &["rencana_rollback", "rollback_plan"]),
            impact_desc: pick_str(v, &["impact_desc"]),
            control_existing: pick_str(v, &["control_existing"]),
            control_effectiveness: pick_str(v, &["control_effectiveness"]),
            mitigation_plan: pick_str(v, &["mitigation_plan"]),
            schedule_start: pick_str(v, &["schedule_start"]),
            schedule_end: pick_str(v, &["schedule_end"]),
            pic_implementation: pick_str(v, &["pic_implementation"]),
            created_at: pick_str(v, &["created_at"]),
        }
    }

    pub fn kind(&self) -> Option<ChangeType> {
        ChangeType::from_str(&self.change_type)
    }

    /// Whether an approver may still decide on this request
    pub fn is_awaiting_decision(&self) -> bool {
        OPEN_APPROVAL_STATUSES.contains(&self.approval_status.as_str())
    }

    /// Whether this request belongs in the change results view
    pub fn is_result(&self) -> bool {
        RESULT_STATUSES.contains(&self.status.to_uppercase().as_str())
    }

    /// Approval status for display, falling back to the workflow status
    pub fn decision_label(&self) -> &str {
        if self.approval_status.is_empty() {
            &self.status
        } else {
            &self.approval_status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_fallbacks() {
        let cr = ChangeRequest::from_json(&json!({
            "id": 17,
            "title": "Upgrade core switch",
            "type": "MAJOR",
            "status": "Approved",
            "impacted_asset_id": "BMD-1",
            "risk_score": 12
        }));
        assert_eq!(cr.id, "17");
        assert_eq!(cr.change_type, "major");
        assert_eq!(cr.kind(), Some(ChangeType::Major));
        assert_eq!(cr.asset_id.as_deref(), Some("BMD-1"));
        assert_eq!(cr.risk_score, Some(12.0));
    }

    #[test]
    fn test_cr_id_wins_over_id() {
        let cr = ChangeRequest::from_json(&json!({"id": "5", "cr_id": "CR-0005"}));
        assert_eq!(cr.id, "CR-0005");
        assert_eq!(cr.record_id.as_deref(), Some("5"));
    }

    #[test]
    fn test_awaiting_decision_is_exact() {
        let mut cr = ChangeRequest::default();
        cr.approval_status = "PENDING".to_string();
        assert!(cr.is_awaiting_decision());
        cr.approval_status = "NEED APPROVAL".to_string();
        assert!(cr.is_awaiting_decision());
        cr.approval_status = "pending".to_string();
        assert!(!cr.is_awaiting_decision());
        cr.approval_status = "APPROVED".to_string();
        assert!(!cr.is_awaiting_decision());
    }

    #[test]
    fn test_is_result_is_case_insensitive() {
        let mut cr = ChangeRequest::default();
        cr.status = "Completed".to_string();
        assert!(cr.is_result());
        cr.status = "ended".to_string();
        assert!(cr.is_result());
        cr.status = "Implementing".to_string();
        assert!(!cr.is_result());
    }
}
