// REST API access: configuration, transport, envelopes, errors

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;

pub use client::{ApiClient, ApiRequest, ApiResponse, HttpTransport, Method, Transport};
pub use config::ClientConfig;
pub use error::ApiError;
