//! Correspondence between new and previously published installers
//!
//! Installers carry no stable key, so each previous installer is paired with
//! the new entry that shares the most attributes with it. Pairing is greedy
//! and independent per previous installer: one new entry may replace several
//! previous ones.

use super::entry::InstallerEntry;
use crate::manifest::{Architecture, Installer};
use tracing::debug;

/// For each previous installer, the index of the new entry that replaces it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    matches: Vec<Option<usize>>,
}

impl MatchResult {
    /// New entry matched to the previous installer at `previous`
    pub fn for_previous(&self, previous: usize) -> Option<usize> {
        self.matches.get(previous).copied().flatten()
    }

    /// First previous installer whose match is the new entry at `new`
    pub fn for_new(&self, new: usize) -> Option<usize> {
        self.matches.iter().position(|m| *m == Some(new))
    }

    /// `(previous, new)` pairs in previous-installer order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(previous, new)| new.map(|new| (previous, new)))
    }

    /// True when no previous installer has a match
    pub fn is_empty(&self) -> bool {
        self.matches.iter().all(Option::is_none)
    }
}

fn both_equal<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// How strongly `new` looks like a replacement for `previous`
pub fn score(new: &InstallerEntry, previous: &Installer) -> u32 {
    let checks = [
        new.architecture == Some(previous.architecture),
        new.url_architecture() == Some(previous.architecture),
        new.installer_url == previous.installer_url,
        both_equal(new.installer_type, previous.installer_type),
        both_equal(new.scope, previous.scope),
        new.scope.is_none() && previous.scope.is_some(),
    ];
    checks.iter().filter(|hit| **hit).count() as u32
}

/// Pair every previous installer with its best new entry.
///
/// On equal scores a candidate replaces the current best only when its URL
/// architecture is still unclaimed and the current best's is already claimed
/// by an earlier previous installer.
pub fn match_installers(new: &[InstallerEntry], previous: &[Installer]) -> MatchResult {
    let mut matches = Vec::with_capacity(previous.len());
    let mut claimed: Vec<Architecture> = Vec::new();
    let is_claimed =
        |claimed: &[Architecture], arch: Option<Architecture>| arch.is_some_and(|a| claimed.contains(&a));

    for (previous_index, old) in previous.iter().enumerate() {
        let mut best: Option<(usize, u32)> = None;

        for (new_index, candidate) in new.iter().enumerate() {
            let candidate_score = score(candidate, old);
            best = match best {
                None => Some((new_index, candidate_score)),
                Some((_, best_score)) if candidate_score > best_score => {
                    Some((new_index, candidate_score))
                }
                Some((best_index, best_score)) if candidate_score == best_score => {
                    let candidate_free = !is_claimed(&claimed, candidate.url_architecture());
                    let best_taken = is_claimed(&claimed, new[best_index].url_architecture());
                    if candidate_free && best_taken {
                        Some((new_index, candidate_score))
                    } else {
                        best
                    }
                }
                keep => keep,
            };
        }

        if let Some((new_index, best_score)) = best {
            debug!(
                previous = previous_index,
                new = new_index,
                score = best_score,
                "Matched installer"
            );
            if let Some(arch) = new[new_index].url_architecture() {
                claimed.push(arch);
            }
        }
        matches.push(best.map(|(new_index, _)| new_index));
    }

    MatchResult { matches }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{InstallerType, Scope};
    use std::collections::BTreeMap;

    fn previous(arch: Architecture, kind: Option<InstallerType>, scope: Option<Scope>) -> Installer {
        Installer {
            installer_locale: None,
            architecture: arch,
            installer_type: kind,
            scope,
            installer_url: format!("https://example.com/old-{}.exe", arch),
            installer_sha256: "OLD".to_string(),
            product_code: None,
            other: BTreeMap::new(),
        }
    }

    fn entry(arch: Option<Architecture>, kind: Option<InstallerType>, url: &str) -> InstallerEntry {
        InstallerEntry {
            architecture: arch,
            installer_type: kind,
            scope: None,
            installer_url: url.to_string(),
            installer_sha256: "NEW".to_string(),
            product_code: None,
            installer_locale: None,
            slot: None,
        }
    }

    #[test]
    fn test_empty_new_list_matches_nothing() {
        let prev = vec![
            previous(Architecture::X64, None, None),
            previous(Architecture::X86, None, None),
        ];
        let result = match_installers(&[], &prev);
        assert!(result.is_empty());
        assert_eq!(result.for_previous(0), None);
        assert_eq!(result.for_previous(1), None);
    }

    #[test]
    fn test_empty_previous_list_matches_nothing() {
        let new = vec![entry(Some(Architecture::X64), None, "https://e.com/a.exe")];
        let result = match_installers(&new, &[]);
        assert!(result.is_empty());
        assert_eq!(result.pairs().count(), 0);
        assert_eq!(result.for_new(0), None);
    }

    #[test]
    fn test_architecture_and_type_score_two() {
        let prev = previous(Architecture::X64, Some(InstallerType::Exe), None);
        let new = entry(
            Some(Architecture::X64),
            Some(InstallerType::Exe),
            "https://example.com/setup.exe",
        );
        assert_eq!(score(&new, &prev), 2);

        let result = match_installers(&[new], &[prev]);
        assert_eq!(result.for_previous(0), Some(0));
        assert_eq!(result.for_new(0), Some(0));
    }

    #[test]
    fn test_one_new_entry_can_replace_several() {
        let prev = vec![
            previous(Architecture::X64, None, None),
            previous(Architecture::Arm64, None, None),
        ];
        let new = vec![entry(Some(Architecture::X64), None, "https://example.com/u1.exe")];

        let result = match_installers(&new, &prev);
        assert_eq!(result.for_previous(0), Some(0));
        assert_eq!(result.for_previous(1), Some(0));
        assert_eq!(result.pairs().collect::<Vec<_>>(), vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn test_url_architecture_scores() {
        let prev = previous(Architecture::Arm64, None, None);
        let by_url = entry(None, None, "https://example.com/app-arm64.msix");
        let plain = entry(None, None, "https://example.com/app.msix");
        assert_eq!(score(&by_url, &prev), 1);
        assert_eq!(score(&plain, &prev), 0);

        let result = match_installers(&[plain, by_url], &[prev]);
        assert_eq!(result.for_previous(0), Some(1));
    }

    #[test]
    fn test_same_url_and_missing_scope_score() {
        let prev = previous(Architecture::X86, None, Some(Scope::Machine));
        // url, url architecture (x86) and the missing-scope bonus
        let mut same = entry(None, None, &prev.installer_url);
        assert_eq!(score(&same, &prev), 3);

        same.scope = Some(Scope::Machine);
        assert_eq!(score(&same, &prev), 3);

        same.scope = Some(Scope::User);
        assert_eq!(score(&same, &prev), 2);
    }

    #[test]
    fn test_tie_prefers_unclaimed_architecture() {
        // Architecture only appears in the new URLs
        let prev = vec![
            previous(Architecture::Neutral, Some(InstallerType::Exe), None),
            previous(Architecture::Neutral, Some(InstallerType::Exe), None),
        ];
        let new = vec![
            entry(None, Some(InstallerType::Exe), "https://example.com/app-x64.exe"),
            entry(None, Some(InstallerType::Exe), "https://example.com/app-x86.exe"),
        ];

        let result = match_installers(&new, &prev);
        assert_eq!(result.for_previous(0), Some(0));
        assert_eq!(result.for_previous(1), Some(1));
    }

    #[test]
    fn test_tie_without_claims_keeps_first() {
        let prev = vec![previous(Architecture::X64, None, None)];
        let new = vec![
            entry(None, None, "https://example.com/a.exe"),
            entry(None, None, "https://example.com/b.exe"),
        ];
        let result = match_installers(&new, &prev);
        assert_eq!(result.for_previous(0), Some(0));
    }

    #[test]
    fn test_matching_is_deterministic() {
        let prev = vec![
            previous(Architecture::X64, Some(InstallerType::Msi), Some(Scope::User)),
            previous(Architecture::X86, Some(InstallerType::Msi), Some(Scope::Machine)),
        ];
        let new = vec![
            entry(None, Some(InstallerType::Msi), "https://example.com/app-x86.msi"),
            entry(None, Some(InstallerType::Msi), "https://example.com/app-x64.msi"),
        ];
        let first = match_installers(&new, &prev);
        assert_eq!(first, match_installers(&new, &prev));
        assert_eq!(first.for_previous(0), Some(1));
        assert_eq!(first.for_previous(1), Some(0));
    }
}
