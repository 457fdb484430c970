//! Change Desk - command-line client for IT change, patch and CMDB management
//!
//! This library provides the core functionality for changedesk, including:
//! - REST API client with a swappable transport
//! - Session persistence (login, logout, stored token)
//! - Data models normalized from loosely-shaped API records
//! - Repository layer for fetching lists and details
//! - Role-based capabilities and approval gating
//! - Mutation actions (approvals, patch jobs, asset edits)
//! - List filter parsing and evaluation
//! - Workflow stage progress and status tones
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use changedesk::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod access;
pub mod actions;
pub mod api;
pub mod cli;
pub mod filter;
pub mod models;
pub mod repo;
pub mod session;
pub mod utils;
pub mod workflow;
