use crate::manifest::{find_architecture, Architecture, Installer, InstallerType, Scope};

/// An installer collected during an update session.
///
/// Only URL and hash are always known; everything else is either carried
/// over from the installer slot the user answered for or left for the
/// assembler to take from the matched previous installer. An entry built for
/// a slot always merges onto that slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerEntry {
    pub architecture: Option<Architecture>,
    pub installer_type: Option<InstallerType>,
    pub scope: Option<Scope>,
    pub installer_url: String,
    pub installer_sha256: String,
    pub product_code: Option<String>,
    pub installer_locale: Option<String>,
    /// Index of the published installer this entry replaces
    pub slot: Option<usize>,
}

impl InstallerEntry {
    /// Entry for a bare URL, as supplied with `--urls`
    pub fn from_url(url: impl Into<String>, sha256: impl Into<String>) -> Self {
        let installer_url = url.into();
        Self {
            architecture: find_architecture(&installer_url),
            installer_type: None,
            scope: None,
            installer_url,
            installer_sha256: sha256.into(),
            product_code: None,
            installer_locale: None,
            slot: None,
        }
    }

    /// Entry replacing the published installer at `index`
    pub fn for_slot(
        index: usize,
        slot: &Installer,
        url: impl Into<String>,
        sha256: impl Into<String>,
        product_code: Option<String>,
    ) -> Self {
        Self {
            architecture: Some(slot.architecture),
            installer_type: slot.installer_type,
            scope: slot.scope,
            installer_url: url.into(),
            installer_sha256: sha256.into(),
            product_code,
            installer_locale: slot.installer_locale.clone(),
            slot: Some(index),
        }
    }

    /// Architecture guessed from the download URL
    pub fn url_architecture(&self) -> Option<Architecture> {
        find_architecture(&self.installer_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_from_url_infers_architecture() {
        let entry = InstallerEntry::from_url("https://example.com/app-arm64.msix", "AB");
        assert_eq!(entry.architecture, Some(Architecture::Arm64));
        assert_eq!(entry.installer_type, None);
        assert_eq!(entry.slot, None);
    }

    #[test]
    fn test_for_slot_copies_slot_fields() {
        let slot = Installer {
            installer_locale: Some("en-US".to_string()),
            architecture: Architecture::X86,
            installer_type: Some(InstallerType::Inno),
            scope: Some(Scope::User),
            installer_url: "https://example.com/old.exe".to_string(),
            installer_sha256: "OLD".to_string(),
            product_code: Some("{OLD}".to_string()),
            other: BTreeMap::new(),
        };
        let entry = InstallerEntry::for_slot(3, &slot, "https://example.com/new.exe", "NEW", None);
        assert_eq!(entry.architecture, Some(Architecture::X86));
        assert_eq!(entry.installer_type, Some(InstallerType::Inno));
        assert_eq!(entry.scope, Some(Scope::User));
        assert_eq!(entry.installer_locale.as_deref(), Some("en-US"));
        assert_eq!(entry.product_code, None);
        assert_eq!(entry.installer_sha256, "NEW");
        assert_eq!(entry.slot, Some(3));
    }
}
