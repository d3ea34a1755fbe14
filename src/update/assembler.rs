//! Building the updated manifest set
//!
//! The new set starts as a copy of the last published one. Installers are
//! rebuilt from the collected entries in the order they were collected, each
//! overlaid on the slot it was collected for or, failing that, the previous
//! installer it was matched to. Every manifest gets
//! the confirmed identifier and version and the newer of the published and
//! supported schema versions.

use super::entry::InstallerEntry;
use super::matcher::MatchResult;
use crate::core::version::Version;
use crate::core::{WingetError, WingetResult};
use crate::manifest::codec::encode;
use crate::manifest::paths::manifest_path;
use crate::manifest::{Installer, ManifestKind, ManifestSet, PackageIdentifier};
use std::collections::BTreeMap;
use tracing::debug;

/// A file of the rendered set. `None` content means nothing is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    pub path: String,
    pub content: Option<String>,
}

/// The newer of the supported schema version and every published one.
///
/// A published version that cannot be parsed means the previous manifests
/// cannot be trusted, so it is an error rather than being overwritten.
pub fn target_manifest_version(previous: &ManifestSet, supported: &str) -> WingetResult<String> {
    let mut best = supported.to_string();
    let mut best_version = Version::parse(supported)?;

    for published in previous.manifest_versions() {
        let version = Version::parse(published).map_err(|e| {
            WingetError::Manifest(format!(
                "Published manifest version '{}' is not valid: {}",
                published, e
            ))
        })?;
        if version > best_version {
            best_version = version;
            best = published.to_string();
        }
    }
    Ok(best)
}

fn merge_installer(
    index: usize,
    entry: &InstallerEntry,
    base: Option<&Installer>,
) -> WingetResult<Installer> {
    let architecture = entry
        .architecture
        .or(base.map(|b| b.architecture))
        .or_else(|| entry.url_architecture())
        .ok_or_else(|| {
            WingetError::Manifest(format!(
                "Cannot determine the architecture of {}",
                entry.installer_url
            ))
        })?;

    debug!(
        index,
        matched = base.is_some(),
        %architecture,
        "Merging installer"
    );

    Ok(Installer {
        installer_locale: entry
            .installer_locale
            .clone()
            .or_else(|| base.and_then(|b| b.installer_locale.clone())),
        architecture,
        installer_type: entry
            .installer_type
            .or(base.and_then(|b| b.installer_type)),
        scope: entry.scope.or(base.and_then(|b| b.scope)),
        installer_url: entry.installer_url.clone(),
        installer_sha256: entry.installer_sha256.clone(),
        product_code: entry
            .product_code
            .clone()
            .or_else(|| base.and_then(|b| b.product_code.clone())),
        other: base.map(|b| b.other.clone()).unwrap_or_else(BTreeMap::new),
    })
}

/// Merge the collected installers into the previous manifests
pub fn assemble(
    identifier: &PackageIdentifier,
    version: &str,
    matches: &MatchResult,
    entries: &[InstallerEntry],
    previous: ManifestSet,
    supported_manifest_version: &str,
) -> WingetResult<ManifestSet> {
    if entries.is_empty() {
        return Err(WingetError::Manifest(
            "No installers were collected".to_string(),
        ));
    }
    let manifest_version = target_manifest_version(&previous, supported_manifest_version)?;

    let installer = match previous.installer {
        Some(mut manifest) => {
            let installers = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let base = entry
                        .slot
                        .or_else(|| matches.for_new(i))
                        .and_then(|p| manifest.installers.get(p));
                    merge_installer(i, entry, base)
                })
                .collect::<WingetResult<Vec<_>>>()?;

            manifest.package_identifier = identifier.clone();
            manifest.package_version = version.to_string();
            manifest.manifest_version = manifest_version.clone();
            manifest.installers = installers;
            Some(manifest)
        }
        None => {
            return Err(WingetError::Manifest(format!(
                "{} has no published installer manifest to update",
                identifier
            )))
        }
    };

    let default_locale = previous.default_locale.map(|mut m| {
        m.package_identifier = identifier.clone();
        m.package_version = version.to_string();
        m.manifest_version = manifest_version.clone();
        m
    });

    let version_manifest = previous.version.map(|mut m| {
        m.package_identifier = identifier.clone();
        m.package_version = version.to_string();
        m.manifest_version = manifest_version.clone();
        m
    });

    let locales = previous
        .locales
        .into_iter()
        .map(|mut m| {
            m.package_identifier = identifier.clone();
            m.package_version = version.to_string();
            m.manifest_version = manifest_version.clone();
            m
        })
        .collect();

    Ok(ManifestSet {
        installer,
        default_locale,
        version: version_manifest,
        locales,
    })
}

/// Render a set to its repository files.
///
/// Order: installer, default locale, version, then the other locales. Parts
/// missing from the set are listed without content.
pub fn render(
    identifier: &PackageIdentifier,
    version: &str,
    set: &ManifestSet,
) -> WingetResult<Vec<ManifestFile>> {
    let mut files = Vec::with_capacity(3 + set.locales.len());

    files.push(ManifestFile {
        path: manifest_path(identifier, version, ManifestKind::Installer, None),
        content: set.installer.as_ref().map(encode).transpose()?,
    });

    let default_locale_tag = set
        .default_locale
        .as_ref()
        .map(|m| m.package_locale.as_str())
        .or_else(|| set.version.as_ref().map(|m| m.default_locale.as_str()));
    if let Some(tag) = default_locale_tag {
        files.push(ManifestFile {
            path: manifest_path(identifier, version, ManifestKind::DefaultLocale, Some(tag)),
            content: set.default_locale.as_ref().map(encode).transpose()?,
        });
    }

    files.push(ManifestFile {
        path: manifest_path(identifier, version, ManifestKind::Version, None),
        content: set.version.as_ref().map(encode).transpose()?,
    });

    for locale in &set.locales {
        files.push(ManifestFile {
            path: manifest_path(
                identifier,
                version,
                ManifestKind::Locale,
                Some(&locale.package_locale),
            ),
            content: Some(encode(locale)?),
        });
    }

    Ok(files)
}
