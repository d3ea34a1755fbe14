//! Winget manifest model
//!
//! This module provides:
//! - Typed installer, locale and version manifests (schema 1.4.0 layout)
//! - A deterministic YAML codec with the schema header comments
//! - The repository path scheme for manifest files
//! - Architecture inference from installer URLs

pub mod architecture;
pub mod codec;
pub mod paths;
pub mod types;

pub use architecture::find_architecture;
pub use types::{
    Architecture, DefaultLocaleManifest, Installer, InstallerManifest, InstallerType,
    LocaleManifest, ManifestKind, ManifestSet, PackageIdentifier, Scope, VersionManifest,
};
