// Status badge tones.
//
// One lookup table replaces the per-screen color switches. Matching rules
// differ by entity (exact, uppercased, lowercased) and are kept here so the
// output layer only maps a tone to a color.

use serde::Serialize;

/// Visual weight of a status value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
    Accent,
}

/// Which column a status value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    ChangeRequest,
    Approval,
    ChangeResult,
    Emergency,
    PatchJob,
    PatchResult,
    Schedule,
    Asset,
    AssetCondition,
    ChangeType,
    /// Per-asset execution outcome (`Complete` / `Uncomplete`)
    ExecutionState,
}

/// Tone for `value` in the given column; unknown values are neutral.
pub fn tone(kind: EntityKind, value: &str) -> Tone {
    use EntityKind::*;
    use Tone::*;

    match kind {
        ChangeRequest => match value {
            "Submitted" => Accent,
            "Approved" => Success,
            "Scheduled" => Warning,
            "Implementing" => Info,
            "Rejected" => Danger,
            _ => Neutral,
        },
        Approval => match value.to_uppercase().as_str() {
            "PENDING" | "NEED APPROVAL" => Warning,
            "APPROVED" => Success,
            "REJECTED" => Danger,
            "REVISION" | "NEED_INFO" => Info,
            _ => Neutral,
        },
        ChangeResult => match value.to_uppercase().as_str() {
            "COMPLETED" => Success,
            "FAILED" => Danger,
            "ENDED" => Info,
            _ => Neutral,
        },
        Emergency => match value {
            "Open" => Danger,
            "In Progress" => Warning,
            "Resolved" => Success,
            _ => Neutral,
        },
        PatchJob => match value.to_lowercase().as_str() {
            "assigned" => Warning,
            "staged" => Info,
            "deploy" | "deploying" => Accent,
            "finished" | "completed" | "succeeded" => Success,
            "failed" => Danger,
            "partially failed" => Warning,
            _ => Neutral,
        },
        PatchResult => match value {
            "Succeeded" => Success,
            "Failed" => Danger,
            "Partially Failed" => Warning,
            _ => Neutral,
        },
        Schedule => match value.to_lowercase().as_str() {
            "completed" => Success,
            "in progress" => Info,
            _ => Neutral,
        },
        Asset => match value.to_lowercase().as_str() {
            "active" | "aktif" => Success,
            "maintenance" => Warning,
            "retired" => Danger,
            _ => Neutral,
        },
        AssetCondition => match value.to_lowercase().as_str() {
            "good" | "baik" => Success,
            "fair" | "cukup" => Warning,
            "poor" | "rusak" => Danger,
            _ => Neutral,
        },
        ChangeType => match value.to_lowercase().as_str() {
            "minor" => Info,
            "major" => Danger,
            _ => Neutral,
        },
        ExecutionState => match value {
            "Complete" => Success,
            "Uncomplete" => Danger,
            _ => Neutral,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_request_exact_match() {
        assert_eq!(tone(EntityKind::ChangeRequest, "Approved"), Tone::Success);
        assert_eq!(tone(EntityKind::ChangeRequest, "approved"), Tone::Neutral);
        assert_eq!(tone(EntityKind::ChangeRequest, "Submitted"), Tone::Accent);
    }

    #[test]
    fn test_approval_and_results_ignore_case() {
        assert_eq!(tone(EntityKind::Approval, "need approval"), Tone::Warning);
        assert_eq!(tone(EntityKind::Approval, "NEED_INFO"), Tone::Info);
        assert_eq!(tone(EntityKind::ChangeResult, "failed"), Tone::Danger);
    }

    #[test]
    fn test_patch_job_variants() {
        assert_eq!(tone(EntityKind::PatchJob, "Deploy"), Tone::Accent);
        assert_eq!(tone(EntityKind::PatchJob, "Completed"), Tone::Success);
        assert_eq!(tone(EntityKind::PatchJob, "Created"), Tone::Neutral);
    }

    #[test]
    fn test_asset_tones() {
        assert_eq!(tone(EntityKind::Asset, "Aktif"), Tone::Success);
        assert_eq!(tone(EntityKind::AssetCondition, "Rusak"), Tone::Danger);
        assert_eq!(tone(EntityKind::ChangeType, "MAJOR"), Tone::Danger);
        assert_eq!(tone(EntityKind::ChangeType, "standard"), Tone::Neutral);
    }
}
