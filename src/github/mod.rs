//! GitHub integration for the manifest repository
//!
//! This module provides functionality for interacting with GitHub to:
//! - List published versions and read manifest files
//! - Fork the upstream repository and create branches
//! - Write multi-file commits through the git data API
//! - Open pull requests

pub mod client;
pub mod types;

pub use client::GitHubClient;
