//! Manifest type definitions

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Dotted package key, e.g. `Microsoft.PowerToys`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageIdentifier(String);

impl PackageIdentifier {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier segments (`Microsoft.PowerToys` -> `["Microsoft", "PowerToys"]`)
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read a scalar as text.
///
/// Flattened structs buffer their values, so an unquoted `PackageVersion: 1.0`
/// arrives as a number rather than a string.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {:?}",
            other
        ))),
    }
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {:?}",
            other
        ))),
    }
}

/// Installer CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86,
    X64,
    Arm,
    Arm64,
    Neutral,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86 => write!(f, "x86"),
            Architecture::X64 => write!(f, "x64"),
            Architecture::Arm => write!(f, "arm"),
            Architecture::Arm64 => write!(f, "arm64"),
            Architecture::Neutral => write!(f, "neutral"),
        }
    }
}

/// Installer technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallerType {
    Msix,
    Msi,
    Appx,
    Exe,
    Zip,
    Inno,
    Nullsoft,
    Wix,
    Burn,
    Pwa,
    Portable,
}

impl fmt::Display for InstallerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallerType::Msix => "msix",
            InstallerType::Msi => "msi",
            InstallerType::Appx => "appx",
            InstallerType::Exe => "exe",
            InstallerType::Zip => "zip",
            InstallerType::Inno => "inno",
            InstallerType::Nullsoft => "nullsoft",
            InstallerType::Wix => "wix",
            InstallerType::Burn => "burn",
            InstallerType::Pwa => "pwa",
            InstallerType::Portable => "portable",
        };
        f.write_str(name)
    }
}

/// Installation scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    User,
    Machine,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::User => write!(f, "user"),
            Scope::Machine => write!(f, "machine"),
        }
    }
}

/// The four manifest kinds published for a package version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ManifestKind {
    Installer,
    DefaultLocale,
    Locale,
    Version,
}

impl ManifestKind {
    /// Name used in the `$schema` URL and the `ManifestType` key
    pub fn schema_name(&self) -> &'static str {
        match self {
            ManifestKind::Installer => "installer",
            ManifestKind::DefaultLocale => "defaultLocale",
            ManifestKind::Locale => "locale",
            ManifestKind::Version => "version",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

/// One installer variant inside an installer manifest.
///
/// Keys this tool does not interpret are kept in `other` so that a
/// decode/encode round trip is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Installer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_locale: Option<String>,
    pub architecture: Architecture,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_type: Option<InstallerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    pub installer_url: String,
    pub installer_sha256: String,
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_code: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallerManifest {
    pub package_identifier: PackageIdentifier,
    #[serde(deserialize_with = "scalar_string")]
    pub package_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_type: Option<InstallerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
    pub installers: Vec<Installer>,
    pub manifest_type: ManifestKind,
    #[serde(deserialize_with = "scalar_string")]
    pub manifest_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultLocaleManifest {
    pub package_identifier: PackageIdentifier,
    #[serde(deserialize_with = "scalar_string")]
    pub package_version: String,
    pub package_locale: String,
    pub publisher: String,
    pub package_name: String,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
    pub manifest_type: ManifestKind,
    #[serde(deserialize_with = "scalar_string")]
    pub manifest_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocaleManifest {
    pub package_identifier: PackageIdentifier,
    #[serde(deserialize_with = "scalar_string")]
    pub package_version: String,
    pub package_locale: String,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
    pub manifest_type: ManifestKind,
    #[serde(deserialize_with = "scalar_string")]
    pub manifest_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionManifest {
    pub package_identifier: PackageIdentifier,
    #[serde(deserialize_with = "scalar_string")]
    pub package_version: String,
    pub default_locale: String,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
    pub manifest_type: ManifestKind,
    #[serde(deserialize_with = "scalar_string")]
    pub manifest_version: String,
}

/// Everything published for one package version.
///
/// Parts are optional because a published version may be incomplete; an
/// absent part is simply not rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestSet {
    pub installer: Option<InstallerManifest>,
    pub default_locale: Option<DefaultLocaleManifest>,
    pub version: Option<VersionManifest>,
    pub locales: Vec<LocaleManifest>,
}

impl ManifestSet {
    /// `(identifier, version, manifest version)` of every present manifest
    fn headers(&self) -> Vec<(&PackageIdentifier, &str, &str)> {
        let mut headers = Vec::new();
        if let Some(m) = &self.installer {
            headers.push((
                &m.package_identifier,
                m.package_version.as_str(),
                m.manifest_version.as_str(),
            ));
        }
        if let Some(m) = &self.default_locale {
            headers.push((
                &m.package_identifier,
                m.package_version.as_str(),
                m.manifest_version.as_str(),
            ));
        }
        if let Some(m) = &self.version {
            headers.push((
                &m.package_identifier,
                m.package_version.as_str(),
                m.manifest_version.as_str(),
            ));
        }
        for m in &self.locales {
            headers.push((
                &m.package_identifier,
                m.package_version.as_str(),
                m.manifest_version.as_str(),
            ));
        }
        headers
    }

    /// True when every present manifest agrees on identifier, version and
    /// manifest version.
    pub fn is_consistent(&self) -> bool {
        let headers = self.headers();
        headers.windows(2).all(|pair| pair[0] == pair[1])
    }

    /// Schema versions of every present manifest
    pub fn manifest_versions(&self) -> Vec<&str> {
        self.headers().into_iter().map(|(_, _, mv)| mv).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.installer.is_none()
            && self.default_locale.is_none()
            && self.version.is_none()
            && self.locales.is_empty()
    }
}
