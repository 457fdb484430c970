use anyhow::{Context, Result};
use crate::api::{envelope, ApiClient};
use crate::models::{DashboardSummary, WeeklyTrendPoint};

pub struct DashboardRepo;

impl DashboardRepo {
    pub fn summary(client: &ApiClient) -> Result<DashboardSummary> {
        let body = client.get("/dashboard/summary").context("Failed to fetch dashboard summary")?;
        Ok(DashboardSummary::from_json(envelope::payload(&body)))
    }

    pub fn weekly_trend(client: &ApiClient) -> Result<Vec<WeeklyTrendPoint>> {
        let body = client.get("/dashboard/weekly-trend").context("Failed to fetch weekly trend")?;
        Ok(WeeklyTrendPoint::list_from_json(envelope::payload(&body)))
    }
}
