//! YAML encoding and decoding of manifest files

use super::types::{
    DefaultLocaleManifest, InstallerManifest, LocaleManifest, ManifestKind, VersionManifest,
};
use crate::core::{WingetError, WingetResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const SCHEMA_BASE_URL: &str = "https://aka.ms/winget-manifest";

/// A manifest that can be written as a standalone file
pub trait ManifestDocument: Serialize + DeserializeOwned {
    fn kind(&self) -> ManifestKind;
    fn manifest_version(&self) -> &str;
}

impl ManifestDocument for InstallerManifest {
    fn kind(&self) -> ManifestKind {
        ManifestKind::Installer
    }

    fn manifest_version(&self) -> &str {
        &self.manifest_version
    }
}

impl ManifestDocument for DefaultLocaleManifest {
    fn kind(&self) -> ManifestKind {
        ManifestKind::DefaultLocale
    }

    fn manifest_version(&self) -> &str {
        &self.manifest_version
    }
}

impl ManifestDocument for LocaleManifest {
    fn kind(&self) -> ManifestKind {
        ManifestKind::Locale
    }

    fn manifest_version(&self) -> &str {
        &self.manifest_version
    }
}

impl ManifestDocument for VersionManifest {
    fn kind(&self) -> ManifestKind {
        ManifestKind::Version
    }

    fn manifest_version(&self) -> &str {
        &self.manifest_version
    }
}

/// Render a manifest with the tool and schema header comments.
///
/// The output carries no timestamps and always ends with a single newline.
pub fn encode<T: ManifestDocument>(manifest: &T) -> WingetResult<String> {
    let body = serde_yaml::to_string(manifest)?;

    let mut out = format!(
        "# Created with wingetup v{}\n# yaml-language-server: $schema={}.{}.{}.schema.json\n\n",
        env!("CARGO_PKG_VERSION"),
        SCHEMA_BASE_URL,
        manifest.kind().schema_name(),
        manifest.manifest_version()
    );
    out.push_str(body.trim_end());
    out.push('\n');
    Ok(out)
}

/// Parse a manifest file, checking its `ManifestType`
pub fn decode<T: ManifestDocument>(text: &str, expected: ManifestKind) -> WingetResult<T> {
    let manifest: T = serde_yaml::from_str(text)?;
    if manifest.kind() != expected {
        return Err(WingetError::Manifest(format!(
            "Expected a {} manifest, found {}",
            expected,
            manifest.kind()
        )));
    }
    Ok(manifest)
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KindHeader {
    manifest_type: ManifestKind,
}

/// Read only the `ManifestType` of a manifest file
pub fn peek_kind(text: &str) -> WingetResult<ManifestKind> {
    let header: KindHeader = serde_yaml::from_str(text)
        .map_err(|e| WingetError::Manifest(format!("Missing or invalid ManifestType: {}", e)))?;
    Ok(header.manifest_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::types::{Architecture, Installer, InstallerType, PackageIdentifier};
    use std::collections::BTreeMap;

    const INSTALLER_YAML: &str = r#"# Created with WinGet Releaser
# yaml-language-server: $schema=https://aka.ms/winget-manifest.installer.1.2.0.schema.json

PackageIdentifier: Contoso.App
PackageVersion: 1.0.0
InstallerType: exe
InstallModes:
- silent
Installers:
- Architecture: x64
  InstallerUrl: https://example.com/app-x64.exe
  InstallerSha256: AAAA
  InstallerSwitches:
    Silent: /S
ManifestType: installer
ManifestVersion: 1.2.0
"#;

    #[test]
    fn test_decode_installer_manifest() {
        let manifest: InstallerManifest = decode(INSTALLER_YAML, ManifestKind::Installer).unwrap();
        assert_eq!(manifest.package_identifier.as_str(), "Contoso.App");
        assert_eq!(manifest.installer_type, Some(InstallerType::Exe));
        assert_eq!(manifest.installers.len(), 1);
        assert_eq!(manifest.installers[0].architecture, Architecture::X64);
        assert!(manifest.other.contains_key("InstallModes"));
        assert!(manifest.installers[0].other.contains_key("InstallerSwitches"));
    }

    #[test]
    fn test_decode_rejects_wrong_kind() {
        let result: WingetResult<VersionManifest> = decode(INSTALLER_YAML, ManifestKind::Version);
        assert!(matches!(result, Err(WingetError::Manifest(_))));
    }

    #[test]
    fn test_encode_header_and_trailing_newline() {
        let manifest: InstallerManifest = decode(INSTALLER_YAML, ManifestKind::Installer).unwrap();
        let text = encode(&manifest).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(format!("# Created with wingetup v{}", env!("CARGO_PKG_VERSION")).as_str())
        );
        assert_eq!(
            lines.next(),
            Some("# yaml-language-server: $schema=https://aka.ms/winget-manifest.installer.1.2.0.schema.json")
        );
        assert_eq!(lines.next(), Some(""));
        assert!(text.ends_with("ManifestVersion: 1.2.0\n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn test_encode_is_stable_across_round_trips() {
        let manifest: InstallerManifest = decode(INSTALLER_YAML, ManifestKind::Installer).unwrap();
        let first = encode(&manifest).unwrap();
        let reparsed: InstallerManifest = decode(&first, ManifestKind::Installer).unwrap();
        assert_eq!(reparsed, manifest);
        assert_eq!(encode(&reparsed).unwrap(), first);
    }

    #[test]
    fn test_encode_built_manifest() {
        let manifest = InstallerManifest {
            package_identifier: PackageIdentifier::new("Contoso.App"),
            package_version: "2.0".to_string(),
            installer_locale: None,
            installer_type: None,
            scope: None,
            other: BTreeMap::new(),
            installers: vec![Installer {
                installer_locale: None,
                architecture: Architecture::Arm64,
                installer_type: Some(InstallerType::Msix),
                scope: None,
                installer_url: "https://example.com/app.msix".to_string(),
                installer_sha256: "BEEF".to_string(),
                product_code: None,
                other: BTreeMap::new(),
            }],
            manifest_type: ManifestKind::Installer,
            manifest_version: "1.4.0".to_string(),
        };
        let text = encode(&manifest).unwrap();
        assert!(text.contains("PackageVersion: '2.0'"));
        assert!(text.contains("Architecture: arm64"));
        assert!(text.contains("ManifestType: installer"));
    }

    #[test]
    fn test_peek_kind() {
        let text = "PackageIdentifier: A.B\nPackageVersion: '1'\nPackageLocale: en-US\nManifestType: defaultLocale\nManifestVersion: 1.4.0\n";
        assert_eq!(peek_kind(text).unwrap(), ManifestKind::DefaultLocale);
        assert!(peek_kind("PackageIdentifier: A.B\n").is_err());
    }
}
