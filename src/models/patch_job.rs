use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::fields::{array, pick_str, str_or};

/// Patch job statuses that count as a finished result (exact match)
pub const RESULT_STATUSES: &[&str] = &["Partially Failed", "Failed", "Succeeded"];

/// Patch job lifecycle status
///
/// The API is loose about spelling (`Deploy` in lists, `Deploying` in
/// details, `Finished` vs `Completed`), so parsing folds the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchStatus {
    Created,
    Assigned,
    Staged,
    Deploying,
    Finished,
    Succeeded,
    Failed,
    PartiallyFailed,
}

impl PatchStatus {
    /// Canonical display label
    pub fn label(&self) -> &'static str {
        match self {
            PatchStatus::Created => "Created",
            PatchStatus::Assigned => "Assigned",
            PatchStatus::Staged => "Staged",
            PatchStatus::Deploying => "Deploying",
            PatchStatus::Finished => "Finished",
            PatchStatus::Succeeded => "Succeeded",
            PatchStatus::Failed => "Failed",
            PatchStatus::PartiallyFailed => "Partially Failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "created" => Some(PatchStatus::Created),
            "assigned" => Some(PatchStatus::Assigned),
            "staged" => Some(PatchStatus::Staged),
            "deploy" | "deploying" => Some(PatchStatus::Deploying),
            "finished" | "completed" => Some(PatchStatus::Finished),
            "succeeded" => Some(PatchStatus::Succeeded),
            "failed" => Some(PatchStatus::Failed),
            "partially failed" => Some(PatchStatus::PartiallyFailed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Succeeded | Self::Failed | Self::PartiallyFailed
        )
    }

    /// One-line explanation shown on the detail view
    pub fn describe(&self) -> (&'static str, &'static str) {
        match self {
            PatchStatus::Created => ("New request created", "Patch job has been created by Diskominfo."),
            PatchStatus::Assigned => ("Sent to technician", "Technician will review the request."),
            PatchStatus::Staged => ("Validated & scheduled", "Technician confirmed schedule & scope."),
            PatchStatus::Deploying => ("Deployment in progress", "Technician is executing the patch."),
            PatchStatus::Finished => ("Finished", "Technician marked the job as finished."),
            PatchStatus::Succeeded => ("Deployment succeeded", "All targeted assets completed."),
            PatchStatus::Failed => ("Deployment failed", "Deployment did not complete successfully."),
            PatchStatus::PartiallyFailed => ("Partially failed", "Some assets succeeded, some failed."),
        }
    }
}

/// Per-asset outcome recorded after execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchResult {
    pub asset_id: String,
    /// `Complete` or `Uncomplete`
    pub state: String,
}

/// Patch job, normalized from the API record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchJob {
    /// `job_id`, falling back to `patch_id`, then `id`
    pub id: String,
    pub job_id: Option<String>,
    pub patch_id: Option<String>,
    /// `scope_asset`, `scope`, `name`, or `title`
    pub scope: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub asset_code: String,
    pub sub_category: String,
    pub type_category: String,
    pub version_before: String,
    pub version_after: String,
    pub estimated_time: String,
    pub dinas: String,
    /// Raw status string; `Assigned` when the API omits it
    pub status: String,
    pub patch_version: Option<String>,
    pub target_group: Option<String>,
    pub technician_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: Option<String>,
    pub results: Vec<PatchResult>,
}

impl PatchJob {
    pub fn from_json(v: &Value) -> Self {
        Self {
            id: str_or(v, &["job_id", "patch_id", "id"], ""),
            job_id: pick_str(v, &["job_id"]),
            patch_id: pick_str(v, &["patch_id"]),
            scope: str_or(v, &["scope_asset", "scope", "name", "title"], ""),
            title: pick_str(v, &["title"]),
            description: pick_str(v, &["description"]),
            asset_code: str_or(v, &["asset_code", "asset_id"], ""),
            sub_category: str_or(v, &["subcategory", "sub_category"], "").trim().to_string(),
            type_category: str_or(v, &["category_type", "type_category"], "").trim().to_string(),
            version_before: str_or(v, &["version_before"], ""),
            version_after: str_or(v, &["version_after"], ""),
            estimated_time: str_or(v, &["schedule_at", "estimated_time", "deadline"], ""),
            dinas: str_or(v, &["dinas"], ""),
            status: str_or(v, &["status"], "Assigned"),
            patch_version: pick_str(v, &["patch_version"]),
            target_group: pick_str(v, &["target_group"]),
            technician_name: pick_str(v, &["technician_name"]),
            start_date: pick_str(v, &["start_date"]),
            end_date: pick_str(v, &["end_date"]),
            created_at: pick_str(v, &["created_at"]),
            results: array(v, "results")
                .iter()
                .filter_map(|r| {
                    Some(PatchResult {
                        asset_id: pick_str(r, &["asset_id"])?,
                        state: str_or(r, &["state"], "Uncomplete"),
                    })
                })
                .collect(),
        }
    }

    pub fn parsed_status(&self) -> Option<PatchStatus> {
        PatchStatus::parse(&self.status)
    }

    /// Whether this job belongs in the patch results view
    pub fn is_result(&self) -> bool {
        RESULT_STATUSES.contains(&self.status.as_str())
    }

    /// Version change for display, e.g. `1.2 → 1.3`
    pub fn version_change(&self) -> String {
        match (self.version_before.is_empty(), self.version_after.is_empty()) {
            (true, true) => "-".to_string(),
            (false, true) => self.version_before.clone(),
            (true, false) => self.version_after.clone(),
            (false, false) => format!("{} → {}", self.version_before, self.version_after),
        }
    }
}

/// Choices offered when creating a patch job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchJobOptions {
    pub agencies: Vec<String>,
    /// `(id, label)` pairs
    pub assets: Vec<(String, String)>,
}

impl PatchJobOptions {
    pub fn from_json(v: &Value) -> Self {
        Self {
            agencies: array(v, "agencies")
                .iter()
                .filter_map(|a| match a {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    other => pick_str(other, &["name", "dinas", "id"]),
                })
                .collect(),
            assets: array(v, "assets")
                .iter()
                .filter_map(|a| {
                    let id = pick_str(a, &["id", "asset_id", "kode_bmd"])?;
                    let label = pick_str(a, &["nama_aset", "name", "kode_bmd"]).unwrap_or_else(|| id.clone());
                    Some((id, label))
                })
                .collect(),
        }
    }
}

/// Payload for creating a patch job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPatchJob {
    pub asset_id: String,
    pub version_before: String,
    pub version_after: String,
    pub deadline: String,
    pub dinas: String,
}

impl NewPatchJob {
    /// Names of required fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("asset_id", &self.asset_id),
            ("version_before", &self.version_before),
            ("version_after", &self.version_after),
            ("deadline", &self.deadline),
            ("dinas", &self.dinas),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
    }
}
