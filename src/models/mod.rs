// Core data models for Change Desk
// Each entity has one canonical shape built by its `from_json` normalizer.

pub mod fields;
pub mod role;
pub mod user;
pub mod change_request;
pub mod emergency;
pub mod patch_job;
pub mod asset;
pub mod schedule;
pub mod dashboard;

pub use role::*;
pub use user::*;
pub use change_request::ChangeRequest;
pub use emergency::*;
pub use patch_job::{NewPatchJob, PatchJob, PatchJobOptions, PatchResult, PatchStatus};
pub use asset::*;
pub use schedule::*;
pub use dashboard::*;
