//! Mock implementations of service traits for testing

use super::traits::{
    BranchRef, CommitRef, ConfigProvider, FileChange, ForkRef, InstallerHasher, PullRequest,
    PullRequestDraft, RepositoryReader, RepositoryWriter,
};
use crate::core::{WingetError, WingetResult};
use crate::manifest::paths::{package_dir, version_dir};
use crate::manifest::PackageIdentifier;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use wingetup::di::mocks::MockConfigProvider;
/// use wingetup::di::ConfigProvider;
///
/// let mut config = MockConfigProvider::default();
/// config.manifest_version = "1.5.0".to_string();
///
/// assert_eq!(config.manifest_version(), "1.5.0");
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub github_api_url: String,
    pub upstream_owner: String,
    pub upstream_repo: String,
    pub upstream_branch: String,
    pub manifest_version: String,
    pub github_token: Option<String>,
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            github_api_url: "http://127.0.0.1:0".to_string(),
            upstream_owner: "microsoft".to_string(),
            upstream_repo: "winget-pkgs".to_string(),
            upstream_branch: "master".to_string(),
            manifest_version: "1.4.0".to_string(),
            github_token: None,
        }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn github_api_url(&self) -> &str {
        &self.github_api_url
    }

    fn upstream_owner(&self) -> &str {
        &self.upstream_owner
    }

    fn upstream_repo(&self) -> &str {
        &self.upstream_repo
    }

    fn upstream_branch(&self) -> &str {
        &self.upstream_branch
    }

    fn manifest_version(&self) -> &str {
        &self.manifest_version
    }

    fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }
}

/// A commit recorded by [`MockRepository`]
#[derive(Debug, Clone)]
pub struct RecordedCommit {
    pub branch: String,
    pub message: String,
    pub changes: Vec<FileChange>,
}

/// In-memory manifest repository for testing
///
/// Serves reads from a path → content map and records every write. Failures
/// can be injected per operation name (`"list_versions"`, `"list_files"`,
/// `"read_file"`, `"fork"`, `"create_branch"`, `"reset_branch"`, `"commit"`,
/// `"open_pull_request"`). Like the real host, creating a branch that was
/// already created is refused.
///
/// # Example
///
/// ```
/// use wingetup::di::mocks::MockRepository;
///
/// let repo = MockRepository::new();
/// repo.add_file("manifests/c/Contoso/App/1.0/Contoso.App.yaml", "ManifestType: version");
/// assert_eq!(repo.file_paths().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockRepository {
    files: Arc<Mutex<BTreeMap<String, String>>>,
    failures: Arc<Mutex<HashSet<&'static str>>>,
    commit_limit: Arc<Mutex<Option<usize>>>,
    reads: Arc<Mutex<Vec<String>>>,
    branches: Arc<Mutex<Vec<String>>>,
    resets: Arc<Mutex<Vec<String>>>,
    commits: Arc<Mutex<Vec<RecordedCommit>>>,
    pull_requests: Arc<Mutex<Vec<PullRequestDraft>>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a published file
    pub fn add_file(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    /// Make the named operation fail
    pub fn fail_on(&self, operation: &'static str) {
        self.failures.lock().unwrap().insert(operation);
    }

    /// Let the named operation succeed again
    pub fn recover(&self, operation: &'static str) {
        self.failures.lock().unwrap().remove(operation);
    }

    /// Only write the first `limit` changes of each commit
    pub fn limit_commit_to(&self, limit: usize) {
        *self.commit_limit.lock().unwrap() = Some(limit);
    }

    pub fn file_paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    /// Paths passed to `read_file`, in order
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    pub fn branches(&self) -> Vec<String> {
        self.branches.lock().unwrap().clone()
    }

    /// Branches forced back to the upstream head, in order
    pub fn resets(&self) -> Vec<String> {
        self.resets.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.commits.lock().unwrap().clone()
    }

    pub fn pull_requests(&self) -> Vec<PullRequestDraft> {
        self.pull_requests.lock().unwrap().clone()
    }

    fn check(&self, operation: &'static str) -> WingetResult<()> {
        if self.failures.lock().unwrap().contains(operation) {
            return Err(WingetError::Github(format!(
                "Injected failure in {}",
                operation
            )));
        }
        Ok(())
    }

    /// Immediate children of `dir`: (name, is_directory)
    fn children(&self, dir: &str) -> Vec<(String, bool)> {
        let prefix = format!("{}/", dir);
        let mut seen = BTreeMap::new();
        for path in self.files.lock().unwrap().keys() {
            if let Some(rest) = path.strip_prefix(&prefix) {
                match rest.split_once('/') {
                    Some((name, _)) => seen.insert(name.to_string(), true),
                    None => seen.insert(rest.to_string(), false),
                };
            }
        }
        seen.into_iter().collect()
    }
}

#[async_trait]
impl RepositoryReader for MockRepository {
    async fn list_versions(&self, identifier: &PackageIdentifier) -> WingetResult<Vec<String>> {
        self.check("list_versions")?;
        Ok(self
            .children(&package_dir(identifier))
            .into_iter()
            .filter(|(name, is_dir)| {
                *is_dir && !name.starts_with(|c: char| c.is_ascii_uppercase())
            })
            .map(|(name, _)| name)
            .collect())
    }

    async fn list_files(
        &self,
        identifier: &PackageIdentifier,
        version: &str,
    ) -> WingetResult<Vec<String>> {
        self.check("list_files")?;
        let files: Vec<String> = self
            .children(&version_dir(identifier, version))
            .into_iter()
            .filter(|(_, is_dir)| !is_dir)
            .map(|(name, _)| name)
            .collect();
        if files.is_empty() {
            return Err(WingetError::NotFound(format!(
                "{} {} does not exist",
                identifier, version
            )));
        }
        Ok(files)
    }

    async fn read_file(&self, path: &str) -> WingetResult<Option<String>> {
        self.check("read_file")?;
        self.reads.lock().unwrap().push(path.to_string());
        Ok(self.files.lock().unwrap().get(path).cloned())
    }
}

#[async_trait]
impl RepositoryWriter for MockRepository {
    async fn fork(&self) -> WingetResult<ForkRef> {
        self.check("fork")?;
        Ok(ForkRef {
            owner: "contributor".to_string(),
            repo: "winget-pkgs".to_string(),
        })
    }

    async fn create_branch(&self, _fork: &ForkRef, name: &str) -> WingetResult<BranchRef> {
        self.check("create_branch")?;
        let mut branches = self.branches.lock().unwrap();
        if branches.iter().any(|b| b == name) {
            return Err(WingetError::AlreadyExists(format!(
                "Reference refs/heads/{} already exists",
                name
            )));
        }
        branches.push(name.to_string());
        Ok(BranchRef {
            name: name.to_string(),
            base_sha: "base".to_string(),
        })
    }

    async fn reset_branch(&self, _fork: &ForkRef, name: &str) -> WingetResult<BranchRef> {
        self.check("reset_branch")?;
        self.resets.lock().unwrap().push(name.to_string());
        Ok(BranchRef {
            name: name.to_string(),
            base_sha: "base".to_string(),
        })
    }

    async fn commit(
        &self,
        _fork: &ForkRef,
        branch: &BranchRef,
        message: &str,
        changes: &[FileChange],
    ) -> WingetResult<CommitRef> {
        self.check("commit")?;
        let limit = self.commit_limit.lock().unwrap().unwrap_or(changes.len());
        let written: Vec<FileChange> = changes.iter().take(limit).cloned().collect();

        let mut commits = self.commits.lock().unwrap();
        let files_written = written.len();
        commits.push(RecordedCommit {
            branch: branch.name.clone(),
            message: message.to_string(),
            changes: written,
        });
        Ok(CommitRef {
            sha: format!("commit{}", commits.len()),
            files_written,
        })
    }

    async fn open_pull_request(&self, draft: &PullRequestDraft) -> WingetResult<PullRequest> {
        self.check("open_pull_request")?;
        let mut pull_requests = self.pull_requests.lock().unwrap();
        pull_requests.push(draft.clone());
        let number = pull_requests.len() as u64;
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/microsoft/winget-pkgs/pull/{}", number),
        })
    }
}

/// Mock installer hasher for testing
///
/// Returns a fixed hash per URL when one was added, otherwise the SHA-256
/// of the URL itself, so results stay deterministic without a network.
#[derive(Clone, Default)]
pub struct MockInstallerHasher {
    hashes: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockInstallerHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hash(&self, url: &str, sha256: &str) {
        self.hashes
            .lock()
            .unwrap()
            .insert(url.to_string(), sha256.to_string());
    }

    /// Make downloads of `url` fail
    pub fn fail_for(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    /// URLs hashed so far, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl InstallerHasher for MockInstallerHasher {
    async fn sha256(&self, url: &str) -> WingetResult<String> {
        self.requested.lock().unwrap().push(url.to_string());
        if self.failing.lock().unwrap().contains(url) {
            return Err(WingetError::Download(format!("Failed to download {}", url)));
        }
        if let Some(hash) = self.hashes.lock().unwrap().get(url) {
            return Ok(hash.clone());
        }
        Ok(hex::encode_upper(Sha256::digest(url.as_bytes())))
    }
}
