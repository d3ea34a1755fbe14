//! Published sample package shared by the update tests

use crate::di::mocks::MockRepository;
use crate::manifest::codec::decode;
use crate::manifest::{ManifestKind, ManifestSet};

pub const SAMPLE_DIR: &str = "manifests/c/Contoso/App";

pub fn installer_yaml(version: &str) -> String {
    format!(
        r#"PackageIdentifier: Contoso.App
PackageVersion: '{version}'
InstallerType: msi
Scope: machine
InstallModes:
- silent
Installers:
- Architecture: x64
  InstallerUrl: https://example.com/{version}/app-x64.msi
  InstallerSha256: AAAA
  ProductCode: '{{11111111-1111-1111-1111-111111111111}}'
  AppsAndFeaturesEntries:
  - DisplayVersion: {version}
- Architecture: x86
  InstallerUrl: https://example.com/{version}/app-x86.msi
  InstallerSha256: BBBB
  ProductCode: '{{22222222-2222-2222-2222-222222222222}}'
ManifestType: installer
ManifestVersion: 1.4.0
"#
    )
}

/// Two x64 installers that differ only by locale and switches
pub fn localized_installer_yaml(version: &str) -> String {
    format!(
        r#"PackageIdentifier: Contoso.App
PackageVersion: '{version}'
InstallerType: exe
Installers:
- InstallerLocale: en-US
  Architecture: x64
  InstallerUrl: https://example.com/{version}/app-en.exe
  InstallerSha256: AAAA
  InstallerSwitches:
    Silent: /LANG=EN
- InstallerLocale: de-DE
  Architecture: x64
  InstallerUrl: https://example.com/{version}/app-de.exe
  InstallerSha256: BBBB
  InstallerSwitches:
    Silent: /LANG=DE
ManifestType: installer
ManifestVersion: 1.4.0
"#
    )
}

pub fn default_locale_yaml(version: &str) -> String {
    format!(
        r#"PackageIdentifier: Contoso.App
PackageVersion: '{version}'
PackageLocale: en-US
Publisher: Contoso Ltd.
PackageName: Contoso App
License: MIT
ShortDescription: Does things
ManifestType: defaultLocale
ManifestVersion: 1.4.0
"#
    )
}

pub fn locale_yaml(version: &str, locale: &str) -> String {
    format!(
        r#"PackageIdentifier: Contoso.App
PackageVersion: '{version}'
PackageLocale: {locale}
ShortDescription: Localized
ManifestType: locale
ManifestVersion: 1.4.0
"#
    )
}

pub fn version_yaml(version: &str) -> String {
    format!(
        r#"PackageIdentifier: Contoso.App
PackageVersion: '{version}'
DefaultLocale: en-US
ManifestType: version
ManifestVersion: 1.4.0
"#
    )
}

/// Publish Contoso.App `version` with an installer, version, default locale
/// and two extra locale manifests
pub fn publish_sample(repo: &MockRepository, version: &str) {
    publish_with_installer(repo, version, &installer_yaml(version));
}

/// Like [`publish_sample`], with the given installer manifest
pub fn publish_with_installer(repo: &MockRepository, version: &str, installer: &str) {
    let dir = format!("{}/{}", SAMPLE_DIR, version);
    repo.add_file(&format!("{}/Contoso.App.installer.yaml", dir), installer);
    repo.add_file(
        &format!("{}/Contoso.App.locale.en-US.yaml", dir),
        &default_locale_yaml(version),
    );
    repo.add_file(
        &format!("{}/Contoso.App.locale.fr-FR.yaml", dir),
        &locale_yaml(version, "fr-FR"),
    );
    repo.add_file(
        &format!("{}/Contoso.App.locale.de-DE.yaml", dir),
        &locale_yaml(version, "de-DE"),
    );
    repo.add_file(&format!("{}/Contoso.App.yaml", dir), &version_yaml(version));
}

/// The sample package as a decoded manifest set
pub fn sample_set(version: &str) -> ManifestSet {
    ManifestSet {
        installer: Some(decode(&installer_yaml(version), ManifestKind::Installer).unwrap()),
        default_locale: Some(
            decode(&default_locale_yaml(version), ManifestKind::DefaultLocale).unwrap(),
        ),
        version: Some(decode(&version_yaml(version), ManifestKind::Version).unwrap()),
        locales: vec![
            decode(&locale_yaml(version, "de-DE"), ManifestKind::Locale).unwrap(),
            decode(&locale_yaml(version, "fr-FR"), ManifestKind::Locale).unwrap(),
        ],
    }
}
