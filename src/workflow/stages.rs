// Linear stage progression for workflow records.
//
// A record's status is looked up in a fixed, ordered list of stages. Every
// stage up to and including the match is complete; the match itself is
// current. There is no transition validation: this is display only.

use serde::Serialize;

/// Ordered stages of one workflow type. A slot with several names holds
/// alternative outcomes that share a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSequence {
    pub name: &'static str,
    pub stages: &'static [&'static [&'static str]],
}

pub const CHANGE_REQUEST: StatusSequence = StatusSequence {
    name: "change-request",
    stages: &[
        &["Submitted"],
        &["Reviewed"],
        &["Revision"],
        &["Approved"],
        &["Scheduled"],
        &["Implementing"],
        &["Completed"],
        &["End"],
    ],
};

pub const PATCH_JOB: StatusSequence = StatusSequence {
    name: "patch-job",
    stages: &[
        &["Created"],
        &["Assigned"],
        &["Staged"],
        &["Deploying"],
        &["Succeeded", "Failed", "Partially Failed"],
    ],
};

impl StatusSequence {
    pub const ALL: [StatusSequence; 2] = [CHANGE_REQUEST, PATCH_JOB];

    /// Look up a sequence by its command-line name
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|seq| seq.name == name)
    }

    /// Position of `status` in the sequence (case-sensitive)
    pub fn position(&self, status: &str) -> Option<usize> {
        self.stages.iter().position(|slot| slot.contains(&status))
    }
}

/// Display state of one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageState {
    pub label: String,
    pub complete: bool,
    pub current: bool,
}

/// Stage-by-stage view of one record's status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub stages: Vec<StageState>,
    /// Index of the current stage, if the status was recognized
    pub reached: Option<usize>,
    /// Set when the status is not part of the sequence
    pub note: Option<String>,
}

/// Compute stage completion for `status`.
///
/// An unrecognized status completes nothing and carries a note.
pub fn progress(sequence: &StatusSequence, status: &str) -> Progress {
    let reached = sequence.position(status);
    let note = if reached.is_none() {
        log::warn!("Status '{}' is not part of the {} workflow", status, sequence.name);
        Some(format!("status '{}' is not part of this workflow", status))
    } else {
        None
    };

    let stages = sequence
        .stages
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let complete = reached.is_some_and(|k| index <= k);
            let label = if reached == Some(index) && slot.len() > 1 {
                status.to_string()
            } else {
                slot.join(" / ")
            };
            StageState {
                label,
                complete,
                current: reached == Some(index),
            }
        })
        .collect();

    Progress { stages, reached, note }
}
