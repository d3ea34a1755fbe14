//! Trait definitions for dependency injection

use crate::core::WingetResult;
use crate::manifest::PackageIdentifier;
use async_trait::async_trait;

/// Trait for configuration access
///
/// Provides read-only access to application configuration.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// Base URL of the GitHub REST API
    fn github_api_url(&self) -> &str;

    /// Owner of the manifest repository
    fn upstream_owner(&self) -> &str;

    /// Name of the manifest repository
    fn upstream_repo(&self) -> &str;

    /// Branch that new branches start from and pull requests target
    fn upstream_branch(&self) -> &str;

    /// Manifest schema version written by this release
    fn manifest_version(&self) -> &str;

    /// Plain-text token from the config file, if any
    fn github_token(&self) -> Option<&str>;
}

/// Writable copy of the manifest repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkRef {
    pub owner: String,
    pub repo: String,
}

/// Branch on a fork, with the commit it was created from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub base_sha: String,
}

/// One file operation inside a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Upsert { path: String, content: String },
    Delete { path: String },
}

impl FileChange {
    pub fn path(&self) -> &str {
        match self {
            FileChange::Upsert { path, .. } | FileChange::Delete { path } => path,
        }
    }
}

/// A commit written to a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub sha: String,
    /// Number of file changes the commit actually contains
    pub files_written: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    /// `<fork owner>:<branch>`
    pub head: String,
    pub base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// Read access to the published manifests
#[async_trait]
pub trait RepositoryReader: Send + Sync {
    /// Published version directories of a package.
    /// An empty list means the package has never been published.
    async fn list_versions(&self, identifier: &PackageIdentifier) -> WingetResult<Vec<String>>;

    /// File names inside one version directory.
    /// Fails with `NotFound` when the version does not exist.
    async fn list_files(
        &self,
        identifier: &PackageIdentifier,
        version: &str,
    ) -> WingetResult<Vec<String>>;

    /// Content of a file by repository path, `None` when it does not exist
    async fn read_file(&self, path: &str) -> WingetResult<Option<String>>;
}

/// Write access used to stage and submit changes
#[async_trait]
pub trait RepositoryWriter: Send + Sync {
    /// Make sure the authenticated user has a fork of the upstream repository
    async fn fork(&self) -> WingetResult<ForkRef>;

    /// Create `name` on the fork, pointing at the upstream branch head.
    /// Fails with `AlreadyExists` when the fork already has that branch.
    async fn create_branch(&self, fork: &ForkRef, name: &str) -> WingetResult<BranchRef>;

    /// Force an existing branch on the fork back to the upstream branch head
    async fn reset_branch(&self, fork: &ForkRef, name: &str) -> WingetResult<BranchRef>;

    /// Apply all `changes` to `branch` as a single commit
    async fn commit(
        &self,
        fork: &ForkRef,
        branch: &BranchRef,
        message: &str,
        changes: &[FileChange],
    ) -> WingetResult<CommitRef>;

    async fn open_pull_request(&self, draft: &PullRequestDraft) -> WingetResult<PullRequest>;
}

/// Downloads an installer and returns its uppercase hex SHA-256
#[async_trait]
pub trait InstallerHasher: Send + Sync {
    async fn sha256(&self, url: &str) -> WingetResult<String>;
}
