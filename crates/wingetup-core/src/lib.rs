//! Core utilities shared by the Wingetup binary and library.
//!
//! Holds the error type, platform paths, keychain-backed credentials and
//! version ordering for winget package and manifest-schema versions.

pub mod core;

pub use crate::core::credentials::CredentialStore;
pub use crate::core::error::{WingetError, WingetResult};
pub use crate::core::error_help::{format_error_with_help, ErrorHelp};
