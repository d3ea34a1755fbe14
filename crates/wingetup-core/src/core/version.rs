use crate::core::error::{WingetError, WingetResult};
use std::cmp::Ordering;
use std::fmt;

/// A dotted version as used by winget package versions and manifest schemas.
///
/// Unlike SemVer, any number of numeric components is allowed ("1.2.3.4",
/// "2024.01"). Missing trailing components compare as zero, so "1.4" and
/// "1.4.0" are equal.
#[derive(Debug, Clone)]
pub struct Version {
    pub parts: Vec<u64>,
    /// Pre-release tag (e.g., "beta.2", "rc1")
    pub prerelease: Option<String>,
    /// Build metadata (e.g., "build.123"), ignored in comparisons
    pub build_metadata: Option<String>,
}

impl Version {
    pub fn new(parts: &[u64]) -> Self {
        Self {
            parts: parts.to_vec(),
            prerelease: None,
            build_metadata: None,
        }
    }

    /// Parse a version string (e.g., "1.2.3", "v2.0", "1.0.0-beta.1", "1.2.3.4+build.5")
    pub fn parse(s: &str) -> WingetResult<Self> {
        let s = s.trim();
        let s = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s);

        let (version_prerelease, build_metadata) = match s.split_once('+') {
            Some((head, build)) => (head, Some(build.to_string())),
            None => (s, None),
        };

        let (version_part, prerelease) = match version_prerelease.split_once('-') {
            Some((head, pre)) if !pre.is_empty() => (head, Some(pre.to_string())),
            _ => (version_prerelease, None),
        };

        if version_part.is_empty() {
            return Err(WingetError::Version(format!("Invalid version format: {}", s)));
        }

        let parts = version_part
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    WingetError::Version(format!("Invalid version component '{}' in {}", part, s))
                })
            })
            .collect::<WingetResult<Vec<u64>>>()?;

        Ok(Self {
            parts,
            prerelease,
            build_metadata,
        })
    }

    fn component(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }
}

/// Pick the highest version from a list of version strings.
///
/// Strings that do not parse sort below every parsable version; among
/// themselves they compare lexically.
pub fn latest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .max_by(|a, b| match (Version::parse(a), Version::parse(b)) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(_), Err(_)) => a.cmp(b),
        })
}

// Build metadata and trailing zero components are ignored
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        // Pre-release versions have lower precedence than normal versions
        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => compare_prerelease_identifiers(a, b),
        }
    }
}

/// Compare pre-release identifiers: numeric < alphanumeric, longer wins ties
fn compare_prerelease_identifiers(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();

    for (a_part, b_part) in a_parts.iter().zip(b_parts.iter()) {
        let ordering = match (a_part.parse::<u64>(), b_part.parse::<u64>()) {
            (Ok(a_num), Ok(b_num)) => a_num.cmp(&b_num),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => a_part.cmp(b_part),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_parts.len().cmp(&b_parts.len())
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .parts
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", joined)?;
        if let Some(ref pre) = self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(ref build) = self.build_metadata {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}
