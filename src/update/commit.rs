//! Staging rendered manifests as one commit on a fork

use super::assembler::ManifestFile;
use crate::core::{WingetError, WingetResult};
use crate::di::{
    BranchRef, CommitRef, FileChange, ForkRef, PullRequest, PullRequestDraft, RepositoryWriter,
};
use crate::manifest::PackageIdentifier;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A commit that is ready for a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    pub fork: ForkRef,
    pub branch: BranchRef,
    pub commit: CommitRef,
    /// Paths the commit touches, in commit order
    pub files: Vec<String>,
}

impl CommitResult {
    /// `<fork owner>:<branch>`, the pull request head
    pub fn head(&self) -> String {
        format!("{}:{}", self.fork.owner, self.branch.name)
    }
}

/// Branch name for a change: `<identifier>-<version>-<content hash>`.
///
/// The hash covers paths and contents, so identical changes always land on
/// the same branch name.
pub fn branch_name(identifier: &PackageIdentifier, version: &str, files: &[ManifestFile]) -> String {
    let mut hasher = Sha256::new();
    for file in files {
        hasher.update(file.path.as_bytes());
        hasher.update([0u8]);
        if let Some(content) = &file.content {
            hasher.update(content.as_bytes());
        }
        hasher.update([0u8]);
    }
    let digest = hex::encode(hasher.finalize());

    let name = format!("{}-{}-{}", identifier, version, &digest[..8]);
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Writes change sets through a [`RepositoryWriter`]
pub struct CommitBuilder {
    writer: Arc<dyn RepositoryWriter>,
}

impl CommitBuilder {
    pub fn new(writer: Arc<dyn RepositoryWriter>) -> Self {
        Self { writer }
    }

    /// Fork the upstream repository and create `branch` on the fork.
    ///
    /// A branch left behind by an earlier attempt at the same change is
    /// reset to the upstream head and reused.
    pub async fn prepare_branch(&self, branch: &str) -> WingetResult<(ForkRef, BranchRef)> {
        let fork = self.writer.fork().await?;
        let branch = match self.writer.create_branch(&fork, branch).await {
            Ok(created) => created,
            Err(WingetError::AlreadyExists(_)) => {
                warn!(branch, "Branch already exists, resetting it");
                self.writer.reset_branch(&fork, branch).await?
            }
            Err(e) => return Err(e),
        };
        info!(owner = %fork.owner, branch = %branch.name, "Prepared branch");
        Ok((fork, branch))
    }

    /// Write every file with content as a single commit.
    ///
    /// Files without content are skipped. A commit that ends up with fewer
    /// files than requested is an error.
    pub async fn build_commit(
        &self,
        fork: ForkRef,
        branch: BranchRef,
        message: &str,
        files: &[ManifestFile],
    ) -> WingetResult<CommitResult> {
        let changes: Vec<FileChange> = files
            .iter()
            .filter_map(|file| {
                file.content.as_ref().map(|content| FileChange::Upsert {
                    path: file.path.clone(),
                    content: content.clone(),
                })
            })
            .collect();
        debug!(
            requested = files.len(),
            written = changes.len(),
            "Building commit"
        );
        self.write(fork, branch, message, changes).await
    }

    /// Delete every path in a single commit
    pub async fn build_deletion(
        &self,
        fork: ForkRef,
        branch: BranchRef,
        message: &str,
        paths: &[String],
    ) -> WingetResult<CommitResult> {
        let changes = paths
            .iter()
            .map(|path| FileChange::Delete { path: path.clone() })
            .collect();
        self.write(fork, branch, message, changes).await
    }

    async fn write(
        &self,
        fork: ForkRef,
        branch: BranchRef,
        message: &str,
        changes: Vec<FileChange>,
    ) -> WingetResult<CommitResult> {
        if changes.is_empty() {
            return Err(WingetError::Manifest("Nothing to commit".to_string()));
        }

        let commit = self.writer.commit(&fork, &branch, message, &changes).await?;
        if commit.files_written != changes.len() {
            return Err(WingetError::Github(format!(
                "Commit {} on {} contains {} of {} files",
                commit.sha,
                branch.name,
                commit.files_written,
                changes.len()
            )));
        }

        info!(sha = %commit.sha, files = changes.len(), "Created commit");
        Ok(CommitResult {
            fork,
            branch,
            commit,
            files: changes.iter().map(|c| c.path().to_string()).collect(),
        })
    }

    /// Open a pull request from the commit's branch into `base`
    pub async fn open_pull_request(
        &self,
        result: &CommitResult,
        title: &str,
        body: &str,
        base: &str,
    ) -> WingetResult<PullRequest> {
        let draft = PullRequestDraft {
            title: title.to_string(),
            body: body.to_string(),
            head: result.head(),
            base: base.to_string(),
        };
        let pull_request = self.writer.open_pull_request(&draft).await?;
        info!(number = pull_request.number, "Opened pull request");
        Ok(pull_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::mocks::MockRepository;

    fn file(path: &str, content: Option<&str>) -> ManifestFile {
        ManifestFile {
            path: path.to_string(),
            content: content.map(str::to_string),
        }
    }

    async fn staged(repo: &MockRepository) -> (CommitBuilder, ForkRef, BranchRef) {
        let builder = CommitBuilder::new(Arc::new(repo.clone()));
        let (fork, branch) = builder.prepare_branch("Contoso.App-2.0-abcdef12").await.unwrap();
        (builder, fork, branch)
    }

    #[tokio::test]
    async fn test_absent_content_is_skipped() {
        let repo = MockRepository::new();
        let (builder, fork, branch) = staged(&repo).await;
        let files = vec![file("a.yaml", Some("content")), file("b.yaml", None)];

        let result = builder
            .build_commit(fork, branch, "Update", &files)
            .await
            .unwrap();
        assert_eq!(result.files, vec!["a.yaml"]);

        let commits = repo.commits();
        assert_eq!(commits.len(), 1);
        assert_eq!(
            commits[0].changes,
            vec![FileChange::Upsert {
                path: "a.yaml".to_string(),
                content: "content".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_partial_commit_is_fatal() {
        let repo = MockRepository::new();
        repo.limit_commit_to(1);
        let (builder, fork, branch) = staged(&repo).await;
        let files = vec![file("a.yaml", Some("a")), file("b.yaml", Some("b"))];

        let result = builder.build_commit(fork, branch, "Update", &files).await;
        assert!(matches!(result, Err(WingetError::Github(_))));
    }

    #[tokio::test]
    async fn test_empty_commit_is_rejected() {
        let repo = MockRepository::new();
        let (builder, fork, branch) = staged(&repo).await;
        let result = builder
            .build_commit(fork, branch, "Update", &[file("a.yaml", None)])
            .await;
        assert!(result.is_err());
        assert!(repo.commits().is_empty());
    }

    #[tokio::test]
    async fn test_deletion_commit() {
        let repo = MockRepository::new();
        let (builder, fork, branch) = staged(&repo).await;
        let paths = vec!["x/A.yaml".to_string(), "x/B.yaml".to_string()];

        let result = builder
            .build_deletion(fork, branch, "Remove", &paths)
            .await
            .unwrap();
        assert_eq!(result.files, paths);
        assert!(matches!(repo.commits()[0].changes[0], FileChange::Delete { .. }));
    }

    #[tokio::test]
    async fn test_pull_request_targets_fork_branch() {
        let repo = MockRepository::new();
        let (builder, fork, branch) = staged(&repo).await;
        let result = builder
            .build_commit(fork, branch, "Update", &[file("a.yaml", Some("a"))])
            .await
            .unwrap();

        let pr = builder
            .open_pull_request(&result, "Contoso.App version 2.0", "", "master")
            .await
            .unwrap();
        assert_eq!(pr.number, 1);

        let drafts = repo.pull_requests();
        assert_eq!(drafts[0].head, "contributor:Contoso.App-2.0-abcdef12");
        assert_eq!(drafts[0].base, "master");
    }

    #[tokio::test]
    async fn test_fork_failure_propagates() {
        let repo = MockRepository::new();
        repo.fail_on("fork");
        let builder = CommitBuilder::new(Arc::new(repo.clone()));
        assert!(builder.prepare_branch("b").await.is_err());
        assert!(repo.branches().is_empty());
    }

    #[tokio::test]
    async fn test_existing_branch_is_reset_and_reused() {
        let repo = MockRepository::new();
        let builder = CommitBuilder::new(Arc::new(repo.clone()));
        builder.prepare_branch("Contoso.App-2.0-abcdef12").await.unwrap();

        let (_, branch) = builder.prepare_branch("Contoso.App-2.0-abcdef12").await.unwrap();
        assert_eq!(branch.name, "Contoso.App-2.0-abcdef12");
        assert_eq!(repo.branches(), vec!["Contoso.App-2.0-abcdef12"]);
        assert_eq!(repo.resets(), vec!["Contoso.App-2.0-abcdef12"]);
    }

    #[tokio::test]
    async fn test_reset_failure_propagates() {
        let repo = MockRepository::new();
        repo.fail_on("reset_branch");
        let builder = CommitBuilder::new(Arc::new(repo.clone()));
        builder.prepare_branch("b").await.unwrap();
        assert!(matches!(
            builder.prepare_branch("b").await,
            Err(WingetError::Github(_))
        ));
    }

    #[test]
    fn test_branch_name_is_deterministic() {
        let id = PackageIdentifier::new("Contoso.App");
        let files = vec![file("a.yaml", Some("a"))];
        let first = branch_name(&id, "2.0 beta", &files);
        assert_eq!(first, branch_name(&id, "2.0 beta", &files));
        assert!(first.starts_with("Contoso.App-2.0-beta-"));
        assert_eq!(first.len(), "Contoso.App-2.0-beta-".len() + 8);

        let other = vec![file("a.yaml", Some("b"))];
        assert_ne!(first, branch_name(&id, "2.0 beta", &other));
    }
}
