pub mod asset;
pub mod change_request;
pub mod dashboard;
pub mod emergency;
pub mod patch_job;

pub use asset::*;
pub use change_request::*;
pub use dashboard::*;
pub use emergency::*;
pub use patch_job::*;
