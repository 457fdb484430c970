use anyhow::{Context, Result};
use crate::api::{envelope, ApiClient};
use crate::models::{PatchJob, PatchJobOptions, PatchSchedule};

pub struct PatchJobRepo;

impl PatchJobRepo {
    pub fn list_all(client: &ApiClient) -> Result<Vec<PatchJob>> {
        let body = client.get("/patch-jobs").context("Failed to fetch patch jobs")?;
        let jobs: Vec<PatchJob> = envelope::items(&body).iter().map(PatchJob::from_json).collect();
        log::debug!("Fetched {} patch jobs", jobs.len());
        Ok(jobs)
    }

    pub fn get(client: &ApiClient, id: &str) -> Result<Option<PatchJob>> {
        let body = client.get(&format!("/patch-jobs/{}", id))
            .with_context(|| format!("Failed to fetch patch job {}", id))?;
        let payload = envelope::payload(&body);
        Ok(envelope::is_present(payload).then(|| PatchJob::from_json(payload)))
    }

    /// Agencies and assets offered when creating a job
    pub fn options(client: &ApiClient) -> Result<PatchJobOptions> {
        let body = client.get("/patch-jobs/options").context("Failed to fetch patch job options")?;
        Ok(PatchJobOptions::from_json(envelope::payload(&body)))
    }
}

pub struct ScheduleRepo;

impl ScheduleRepo {
    pub fn list_all(client: &ApiClient) -> Result<Vec<PatchSchedule>> {
        let body = client.get("/patch-schedules").context("Failed to fetch patch schedules")?;
        Ok(envelope::items(&body).iter().map(PatchSchedule::from_json).collect())
    }
}
