// Workflow presentation: stage progression and status tones

pub mod badge;
pub mod stages;

pub use badge::{tone, EntityKind, Tone};
pub use stages::{progress, Progress, StageState, StatusSequence, CHANGE_REQUEST, PATCH_JOB};
