//! Wingetup: quick updates of published winget package manifests
//!
//! This crate provides the main Wingetup library, re-exporting core
//! functionality from `wingetup-core` and organizing the modules that load,
//! reconcile and resubmit a package's manifests.

pub use wingetup_core::{format_error_with_help, CredentialStore, ErrorHelp, WingetError, WingetResult};

/// Core module re-exported from wingetup-core.
pub mod core {
    pub use wingetup_core::core::*;
    pub use wingetup_core::*;
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// GitHub integration for reading manifests and opening pull requests.
pub mod github;

/// Installer downloads and hashing.
pub mod installer;

/// Manifest model, codec and repository layout.
pub mod manifest;

/// Declarative validation of prompted values.
pub mod validation;

/// Interactive input.
pub mod prompt;

/// The update workflow.
pub mod update;

/// The remove workflow.
pub mod remove;
