//! Repository layout of published manifests

use super::types::{ManifestKind, PackageIdentifier};

/// Root directory of all manifests in the repository
pub const MANIFESTS_ROOT: &str = "manifests";

/// Directory holding every version of a package:
/// `manifests/<first char>/<Publisher>/<Name>`
pub fn package_dir(identifier: &PackageIdentifier) -> String {
    let first = identifier
        .as_str()
        .chars()
        .next()
        .map(|c| c.to_lowercase().to_string())
        .unwrap_or_default();

    let mut path = format!("{}/{}", MANIFESTS_ROOT, first);
    for segment in identifier.segments() {
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// Directory holding one published version
pub fn version_dir(identifier: &PackageIdentifier, version: &str) -> String {
    format!("{}/{}", package_dir(identifier), version)
}

/// File name for a manifest of the given kind.
///
/// `locale` is required for locale kinds and ignored otherwise.
pub fn file_name(identifier: &PackageIdentifier, kind: ManifestKind, locale: Option<&str>) -> String {
    match (kind, locale) {
        (ManifestKind::Installer, _) => format!("{}.installer.yaml", identifier),
        (ManifestKind::DefaultLocale | ManifestKind::Locale, Some(locale)) => {
            format!("{}.locale.{}.yaml", identifier, locale)
        }
        (ManifestKind::DefaultLocale | ManifestKind::Locale, None) => {
            format!("{}.locale.yaml", identifier)
        }
        (ManifestKind::Version, _) => format!("{}.yaml", identifier),
    }
}

/// Full repository path of a manifest file
pub fn manifest_path(
    identifier: &PackageIdentifier,
    version: &str,
    kind: ManifestKind,
    locale: Option<&str>,
) -> String {
    format!(
        "{}/{}",
        version_dir(identifier, version),
        file_name(identifier, kind, locale)
    )
}

/// True for file names of the form `<id>.locale.<tag>.yaml`
pub fn is_locale_file(identifier: &PackageIdentifier, name: &str) -> bool {
    let prefix = format!("{}.locale.", identifier);
    name.len() > prefix.len() + ".yaml".len()
        && name.starts_with(&prefix)
        && name.ends_with(".yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_dir() {
        let id = PackageIdentifier::new("Microsoft.PowerToys");
        assert_eq!(package_dir(&id), "manifests/m/Microsoft/PowerToys");
    }

    #[test]
    fn test_manifest_paths() {
        let id = PackageIdentifier::new("Git.Git");
        assert_eq!(
            manifest_path(&id, "2.43.0", ManifestKind::Installer, None),
            "manifests/g/Git/Git/2.43.0/Git.Git.installer.yaml"
        );
        assert_eq!(
            manifest_path(&id, "2.43.0", ManifestKind::DefaultLocale, Some("en-US")),
            "manifests/g/Git/Git/2.43.0/Git.Git.locale.en-US.yaml"
        );
        assert_eq!(
            manifest_path(&id, "2.43.0", ManifestKind::Version, None),
            "manifests/g/Git/Git/2.43.0/Git.Git.yaml"
        );
    }

    #[test]
    fn test_is_locale_file() {
        let id = PackageIdentifier::new("Git.Git");
        assert!(is_locale_file(&id, "Git.Git.locale.de-DE.yaml"));
        assert!(!is_locale_file(&id, "Git.Git.installer.yaml"));
        assert!(!is_locale_file(&id, "Git.Git.yaml"));
        assert!(!is_locale_file(&id, "Git.Git.locale..yaml"));
    }
}
