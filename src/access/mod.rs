// Role-based visibility and action rules.
//
// Everything here is a pure function of the role and a record; the server
// remains the authority and may still reject a request.

use serde::Serialize;
use crate::models::{ChangeRequest, ChangeType, PatchStatus, Role};

/// Something a role is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Capability {
    ViewApprovals,
    DecideApprovals,
    CreatePatchJob,
    AssignPatchJob,
    PlanPatchJob,
    ExecutePatchJob,
    FinishPatchJob,
    EditAsset,
    EditAssetSpecifications,
    EditAssetRelations,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewApprovals => "view-approvals",
            Capability::DecideApprovals => "decide-approvals",
            Capability::CreatePatchJob => "create-patch-job",
            Capability::AssignPatchJob => "assign-patch-job",
            Capability::PlanPatchJob => "plan-patch-job",
            Capability::ExecutePatchJob => "execute-patch-job",
            Capability::FinishPatchJob => "finish-patch-job",
            Capability::EditAsset => "edit-asset",
            Capability::EditAssetSpecifications => "edit-asset-specifications",
            Capability::EditAssetRelations => "edit-asset-relations",
        }
    }
}

/// Change types a role may see and decide in the approval queue
pub fn accessible_types(role: Role) -> &'static [ChangeType] {
    match role {
        Role::Kasi => &[ChangeType::Minor, ChangeType::Standard, ChangeType::Major],
        Role::Kabid => &[ChangeType::Standard, ChangeType::Major],
        Role::Diskominfo => &[ChangeType::Major],
        Role::Teknisi => &[],
    }
}

/// Static capability set of a role
pub fn capabilities(role: Role) -> Vec<Capability> {
    let mut caps = Vec::new();
    if !accessible_types(role).is_empty() {
        caps.push(Capability::ViewApprovals);
        caps.push(Capability::DecideApprovals);
    }
    match role {
        Role::Diskominfo => {
            caps.push(Capability::CreatePatchJob);
            caps.push(Capability::AssignPatchJob);
        }
        Role::Teknisi => {
            caps.push(Capability::PlanPatchJob);
            caps.push(Capability::ExecutePatchJob);
            caps.push(Capability::FinishPatchJob);
            caps.push(Capability::EditAsset);
            caps.push(Capability::EditAssetSpecifications);
            caps.push(Capability::EditAssetRelations);
        }
        Role::Kasi | Role::Kabid => {}
    }
    caps
}

pub fn has_capability(role: Role, capability: Capability) -> bool {
    capabilities(role).contains(&capability)
}

/// Whether a change request passes the role's type gate
pub fn can_view_change(role: Role, cr: &ChangeRequest) -> bool {
    cr.kind().is_some_and(|kind| accessible_types(role).contains(&kind))
}

pub fn can_edit_asset(role: Role) -> bool {
    has_capability(role, Capability::EditAsset)
}

/// Patch job action offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PatchAction {
    /// Hand a newly created job to a technician
    Send,
    Plan,
    Execute,
    Finish,
    /// Read-only marker for finished jobs
    Completed,
}

impl PatchAction {
    pub fn label(&self) -> &'static str {
        match self {
            PatchAction::Send => "Send",
            PatchAction::Plan => "Plan",
            PatchAction::Execute => "Execute",
            PatchAction::Finish => "Finish",
            PatchAction::Completed => "Completed",
        }
    }
}

/// Action available for a job in `status`, if any
pub fn patch_action(role: Role, status: &str) -> Option<PatchAction> {
    let parsed = PatchStatus::parse(status)?;
    match role {
        Role::Diskominfo if parsed == PatchStatus::Created => Some(PatchAction::Send),
        Role::Teknisi => match parsed {
            PatchStatus::Assigned => Some(PatchAction::Plan),
            PatchStatus::Staged => Some(PatchAction::Execute),
            PatchStatus::Deploying => Some(PatchAction::Finish),
            s if s.is_terminal() => Some(PatchAction::Completed),
            _ => None,
        },
        _ => None,
    }
}

/// Decision on a change request awaiting approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApprovalAction {
    Approve,
    Reject,
    NeedInfo,
}

impl ApprovalAction {
    pub const ALL: [ApprovalAction; 3] = [ApprovalAction::Approve, ApprovalAction::Reject, ApprovalAction::NeedInfo];

    pub fn label(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "Approve",
            ApprovalAction::Reject => "Reject",
            ApprovalAction::NeedInfo => "Need Info",
        }
    }

    /// Endpoint suffix under `/change-requests/{id}`
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::NeedInfo => "need-info",
        }
    }

    /// Reject and Need-Info must explain themselves
    pub fn requires_note(&self) -> bool {
        !matches!(self, ApprovalAction::Approve)
    }
}

/// What the approval detail view offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalGate {
    Open(Vec<ApprovalAction>),
    /// Decision already made; carries the approval status
    Processed(String),
    /// The role may not decide on this change type
    NotPermitted,
}

pub fn approval_gate(role: Role, cr: &ChangeRequest) -> ApprovalGate {
    if !has_capability(role, Capability::DecideApprovals) || !can_view_change(role, cr) {
        return ApprovalGate::NotPermitted;
    }
    if cr.is_awaiting_decision() {
        ApprovalGate::Open(ApprovalAction::ALL.to_vec())
    } else {
        ApprovalGate::Processed(cr.decision_label().to_string())
    }
}
