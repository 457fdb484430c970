use anyhow::{Context, Result};
use serde_json::Value;
use crate::api::{envelope, ApiClient};
use crate::models::ChangeRequest;

pub struct ChangeRequestRepo;

impl ChangeRequestRepo {
    /// All change requests visible to the session
    pub fn list_all(client: &ApiClient) -> Result<Vec<ChangeRequest>> {
        let body = client.get("/change-requests")
            .context("Failed to fetch change requests")?;
        let items: Vec<ChangeRequest> = envelope::items(&body).iter().map(ChangeRequest::from_json).collect();
        log::debug!("Fetched {} change requests", items.len());
        Ok(items)
    }

    /// One change request by `cr_id` or `id`; `None` when the payload is empty
    pub fn get(client: &ApiClient, id: &str) -> Result<Option<ChangeRequest>> {
        let body = client.get(&format!("/change-requests/{}", id))
            .with_context(|| format!("Failed to fetch change request {}", id))?;
        let payload = envelope::payload(&body);
        Ok(envelope::is_present(payload).then(|| ChangeRequest::from_json(payload)))
    }

    /// Approval level the server assigns to the current user
    pub fn approval_role(client: &ApiClient) -> Result<Value> {
        let body = client.get("/change-requests/approval-role")
            .context("Failed to fetch approval role")?;
        Ok(envelope::payload(&body).clone())
    }
}
