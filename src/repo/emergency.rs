use anyhow::{Context, Result};
use crate::api::{envelope, ApiClient};
use crate::models::EmergencyTicket;

pub struct EmergencyRepo;

impl EmergencyRepo {
    pub fn list_all(client: &ApiClient) -> Result<Vec<EmergencyTicket>> {
        let body = client.get("/emergency").context("Failed to fetch emergencies")?;
        Ok(envelope::items(&body).iter().map(EmergencyTicket::from_json).collect())
    }

    pub fn get(client: &ApiClient, id: &str) -> Result<Option<EmergencyTicket>> {
        let body = client.get(&format!("/emergency/{}", id))
            .with_context(|| format!("Failed to fetch emergency {}", id))?;
        let payload = envelope::payload(&body);
        Ok(envelope::is_present(payload).then(|| EmergencyTicket::from_json(payload)))
    }
}
