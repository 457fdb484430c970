// Mutations: approval decisions, patch job creation and assignment, asset edits.
//
// Each action is one request and one response. Local validation and
// permission checks run first; when they fail nothing is sent.

use serde_json::{json, Value};
use thiserror::Error;
use crate::access::{self, ApprovalAction, ApprovalGate, Capability};
use crate::api::{envelope, ApiClient, ApiError};
use crate::models::{AssetUpdate, ChangeRequest, NewPatchJob, PatchJob, PatchStatus, Role};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn require(role: Role, capability: Capability, what: &str) -> Result<(), ActionError> {
    if access::has_capability(role, capability) {
        Ok(())
    } else {
        Err(ActionError::Forbidden(format!("Role '{}' cannot {}", role, what)))
    }
}

/// Check the note before anything else: Reject and Need-Info need one.
pub fn validate_note(action: ApprovalAction, note: &str) -> Result<(), ActionError> {
    if action.requires_note() && note.trim().is_empty() {
        return Err(ActionError::Validation(format!(
            "A note is required for {}",
            action.label()
        )));
    }
    Ok(())
}

/// Record an approval decision on a change request.
///
/// The request is re-fetched so the decision is only sent while it is still
/// awaiting one and its type is within the role's reach.
pub fn decide(
    client: &ApiClient,
    role: Role,
    id: &str,
    action: ApprovalAction,
    note: &str,
) -> Result<Value, ActionError> {
    validate_note(action, note)?;

    let body = client.get(&format!("/change-requests/{}", id))?;
    let payload = envelope::payload(&body);
    if !envelope::is_present(payload) {
        return Err(ActionError::Validation(format!("Change request {} not found", id)));
    }
    let cr = ChangeRequest::from_json(payload);

    match access::approval_gate(role, &cr) {
        ApprovalGate::Open(actions) if actions.contains(&action) => {}
        ApprovalGate::Open(_) | ApprovalGate::NotPermitted => {
            return Err(ActionError::Forbidden(format!(
                "Role '{}' cannot decide on {} change requests",
                role,
                if cr.change_type.is_empty() { "untyped" } else { &cr.change_type }
            )));
        }
        ApprovalGate::Processed(status) => {
            return Err(ActionError::Validation(format!(
                "Change request {} was already processed with status: {}",
                id, status
            )));
        }
    }

    let path = format!("/change-requests/{}/{}", id, action.endpoint());
    let response = client.post(&path, Some(json!({ "note": note.trim() })))?;
    log::info!("{} recorded for change request {}", action.label(), id);
    Ok(response)
}

/// Result of creating a patch job: the server response and the re-fetched list
#[derive(Debug)]
pub struct CreatedPatchJob {
    pub response: Value,
    pub jobs: Vec<PatchJob>,
}

pub fn create_patch_job(client: &ApiClient, role: Role, new_job: &NewPatchJob) -> Result<CreatedPatchJob, ActionError> {
    require(role, Capability::CreatePatchJob, "create patch jobs")?;
    let missing = new_job.missing_fields();
    if !missing.is_empty() {
        return Err(ActionError::Validation(format!(
            "Please fill all required fields: {}",
            missing.join(", ")
        )));
    }

    let body = json!({
        "asset_id": new_job.asset_id.trim(),
        "version_before": new_job.version_before.trim(),
        "version_after": new_job.version_after.trim(),
        "deadline": new_job.deadline.trim(),
        "dinas": new_job.dinas.trim(),
    });
    let response = client.post("/patch-jobs", Some(body))?;
    log::info!("Patch job created for asset {}", new_job.asset_id);

    let jobs = match client.get("/patch-jobs") {
        Ok(list) => envelope::items(&list).iter().map(PatchJob::from_json).collect(),
        Err(e) => {
            log::error!("Failed to refresh patch jobs after create: {}", e);
            Vec::new()
        }
    };
    Ok(CreatedPatchJob { response, jobs })
}

/// Send a newly created job to its technician
pub fn assign_patch_job(client: &ApiClient, role: Role, id: &str) -> Result<Value, ActionError> {
    require(role, Capability::AssignPatchJob, "send patch jobs")?;

    let body = client.get(&format!("/patch-jobs/{}", id))?;
    let payload = envelope::payload(&body);
    if !envelope::is_present(payload) {
        return Err(ActionError::Validation(format!("Patch job {} not found", id)));
    }
    let job = PatchJob::from_json(payload);
    if job.parsed_status() != Some(PatchStatus::Created) {
        return Err(ActionError::Validation(format!(
            "Patch job {} has status '{}'; only created jobs can be sent",
            id, job.status
        )));
    }

    let response = client.post(&format!("/patch-jobs/{}/assign", id), None)?;
    log::info!("Patch job {} sent to technician", id);
    Ok(response)
}

pub fn update_asset(client: &ApiClient, role: Role, id: &str, update: &AssetUpdate) -> Result<Value, ActionError> {
    require(role, Capability::EditAsset, "edit CMDB assets")?;
    if update.is_empty() {
        return Err(ActionError::Validation("No fields to update".to_string()));
    }
    let response = client.put(&format!("/cmdb/assets/{}", id), update.to_json())?;
    log::info!("Asset {} updated", id);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::FakeTransport;
    use crate::api::Method;

    fn client(fake: &std::sync::Arc<FakeTransport>) -> ApiClient {
        ApiClient::new(fake.clone(), Some("tok".to_string()))
    }

    fn complete_job() -> NewPatchJob {
        NewPatchJob {
            asset_id: "A1".to_string(),
            version_before: "1.0".to_string(),
            version_after: "1.1".to_string(),
            deadline: "2026-11-01".to_string(),
            dinas: "Dinas A".to_string(),
        }
    }

    #[test]
    fn test_blank_note_sends_nothing() {
        let fake = FakeTransport::new();
        for action in [ApprovalAction::Reject, ApprovalAction::NeedInfo] {
            let err = decide(&client(&fake), Role::Kasi, "CR-1", action, "   ").unwrap_err();
            assert!(matches!(err, ActionError::Validation(_)));
        }
        assert!(fake.sent().is_empty());
    }

    #[test]
    fn test_approve_posts_note() {
        let fake = FakeTransport::new();
        fake.respond(200, json!({"data": {"cr_id": "CR-1", "type": "minor", "approval_status": "PENDING"}}));
        fake.respond(200, json!({"message": "ok"}));
        decide(&client(&fake), Role::Kasi, "CR-1", ApprovalAction::Approve, "").unwrap();
        let sent = fake.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].method, Method::Post);
        assert_eq!(sent[1].path, "/change-requests/CR-1/approve");
        assert_eq!(sent[1].body, Some(json!({"note": ""})));
    }

    #[test]
    fn test_processed_request_is_not_decided() {
        let fake = FakeTransport::new();
        fake.respond(200, json!({"data": {"cr_id": "CR-1", "type": "minor", "approval_status": "APPROVED"}}));
        let err = decide(&client(&fake), Role::Kasi, "CR-1", ApprovalAction::Reject, "late").unwrap_err();
        assert_eq!(err.to_string(), "Change request CR-1 was already processed with status: APPROVED");
        assert_eq!(fake.sent().len(), 1);
    }

    #[test]
    fn test_type_outside_role_is_forbidden() {
        let fake = FakeTransport::new();
        fake.respond(200, json!({"cr_id": "CR-2", "type": "minor", "approval_status": "PENDING"}));
        let err = decide(&client(&fake), Role::Diskominfo, "CR-2", ApprovalAction::Approve, "").unwrap_err();
        assert!(matches!(err, ActionError::Forbidden(_)));
        assert_eq!(fake.sent().len(), 1);
    }

    #[test]
    fn test_create_requires_all_fields() {
        let fake = FakeTransport::new();
        let mut job = complete_job();
        job.deadline = String::new();
        let err = create_patch_job(&client(&fake), Role::Diskominfo, &job).unwrap_err();
        assert_eq!(err.to_string(), "Please fill all required fields: deadline");
        assert!(fake.sent().is_empty());
    }

    #[test]
    fn test_create_is_diskominfo_only() {
        let fake = FakeTransport::new();
        let err = create_patch_job(&client(&fake), Role::Teknisi, &complete_job()).unwrap_err();
        assert!(matches!(err, ActionError::Forbidden(_)));
        assert!(fake.sent().is_empty());
    }

    #[test]
    fn test_create_then_refetch() {
        let fake = FakeTransport::new();
        fake.respond(201, json!({"data": {"job_id": "J9"}}));
        fake.respond(200, json!({"data": [{"job_id": "J9", "status": "Created"}]}));
        let created = create_patch_job(&client(&fake), Role::Diskominfo, &complete_job()).unwrap();
        assert_eq!(created.jobs.len(), 1);
        let sent = fake.sent();
        assert_eq!(sent[0].path, "/patch-jobs");
        assert_eq!(sent[0].body.as_ref().unwrap()["dinas"], "Dinas A");
        assert_eq!(sent[1].method, Method::Get);
    }

    #[test]
    fn test_assign_only_created_jobs() {
        let fake = FakeTransport::new();
        fake.respond(200, json!({"data": {"job_id": "J1", "status": "Assigned"}}));
        let err = assign_patch_job(&client(&fake), Role::Diskominfo, "J1").unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert_eq!(fake.sent().len(), 1);

        fake.respond(200, json!({"data": {"job_id": "J2", "status": "created"}}));
        fake.respond(200, json!({}));
        assign_patch_job(&client(&fake), Role::Diskominfo, "J2").unwrap();
        let sent = fake.sent();
        assert_eq!(sent[2].path, "/patch-jobs/J2/assign");
        assert!(sent[2].body.is_none());
    }

    #[test]
    fn test_update_asset_rules() {
        let fake = FakeTransport::new();
        let mut update = AssetUpdate::default();
        update.set("lokasi", "Gedung C").unwrap();

        let err = update_asset(&client(&fake), Role::Diskominfo, "7", &update).unwrap_err();
        assert!(matches!(err, ActionError::Forbidden(_)));
        let err = update_asset(&client(&fake), Role::Teknisi, "7", &AssetUpdate::default()).unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert!(fake.sent().is_empty());

        fake.respond(200, json!({"data": {}}));
        update_asset(&client(&fake), Role::Teknisi, "7", &update).unwrap();
        let sent = fake.sent();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].body, Some(json!({"lokasi": "Gedung C"})));
    }

    #[test]
    fn test_server_failure_is_api_error() {
        let fake = FakeTransport::new();
        fake.respond(500, json!({}));
        let mut update = AssetUpdate::default();
        update.set("merk", "Cisco").unwrap();
        let err = update_asset(&client(&fake), Role::Teknisi, "7", &update).unwrap_err();
        assert!(matches!(err, ActionError::Api(ApiError::Http { status: 500, .. })));
    }
}
