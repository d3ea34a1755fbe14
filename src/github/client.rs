//! GitHub API client implementation

use crate::core::{WingetError, WingetResult};
use crate::di::traits::{
    BranchRef, CommitRef, ConfigProvider, FileChange, ForkRef, PullRequest, PullRequestDraft,
    RepositoryReader, RepositoryWriter,
};
use crate::github::types::{
    ContentKind, ContentsResponse, GitCommit, GitHubRepo, GitHubUser, GitObject, GitRef,
    PullRequestResponse, TreeEntry,
};
use crate::manifest::paths::{package_dir, version_dir};
use crate::manifest::PackageIdentifier;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{header, Client as HttpClient, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// GitHub API client
///
/// Reads manifests from the upstream repository and stages changes on the
/// authenticated user's fork.
pub struct GitHubClient {
    http_client: HttpClient,
    api_url: String,
    token: Option<String>,
    upstream_owner: String,
    upstream_repo: String,
    upstream_branch: String,
    rate_limiter: Arc<RateLimiter>,
}

/// Rate limiter for GitHub API
struct RateLimiter {
    remaining: Mutex<u64>,
    reset_time: Mutex<SystemTime>,
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: &dyn ConfigProvider, token: Option<String>) -> WingetResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("wingetup/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        if let Some(ref token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("token {}", token))
                    .map_err(|e| WingetError::Config(format!("Invalid GitHub token: {}", e)))?,
            );
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WingetError::Github(format!("Failed to create HTTP client: {}", e)))?;

        let has_token = token.is_some();
        Ok(Self {
            http_client,
            api_url: config.github_api_url().trim_end_matches('/').to_string(),
            token,
            upstream_owner: config.upstream_owner().to_string(),
            upstream_repo: config.upstream_repo().to_string(),
            upstream_branch: config.upstream_branch().to_string(),
            rate_limiter: Arc::new(RateLimiter {
                remaining: Mutex::new(if has_token { 5000 } else { 60 }),
                reset_time: Mutex::new(SystemTime::now() + Duration::from_secs(3600)),
            }),
        })
    }

    /// `owner/repo` of the upstream manifest repository
    pub fn upstream_full_name(&self) -> String {
        format!("{}/{}", self.upstream_owner, self.upstream_repo)
    }

    fn upstream_url(&self, rest: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.upstream_owner, self.upstream_repo, rest
        )
    }

    fn fork_url(&self, fork: &ForkRef, rest: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_url, fork.owner, fork.repo, rest)
    }

    /// The user the token belongs to
    pub async fn authenticated_user(&self) -> WingetResult<String> {
        self.require_token()?;
        let url = format!("{}/user", self.api_url);
        let user: GitHubUser = self.api_get(&url).await?;
        Ok(user.login)
    }

    /// Fetch a path from the upstream branch, `None` on 404
    async fn get_contents(&self, path: &str) -> WingetResult<Option<ContentsResponse>> {
        let url = self.upstream_url(&format!(
            "contents/{}?ref={}",
            encode_path(path),
            urlencoding::encode(&self.upstream_branch)
        ));
        match self.api_get(&url).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get file content from the upstream repository
    pub async fn get_file_content(&self, path: &str) -> WingetResult<Option<String>> {
        let file = match self.get_contents(path).await? {
            None => return Ok(None),
            Some(ContentsResponse::File(file)) => file,
            Some(ContentsResponse::Directory(_)) => {
                return Err(WingetError::Github(format!("{} is a directory", path)))
            }
        };

        // GitHub returns base64-encoded content
        if file.encoding != "base64" {
            return Err(WingetError::Github(format!(
                "Unexpected encoding: {}",
                file.encoding
            )));
        }

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(file.content.replace('\n', ""))
            .map_err(|e| WingetError::Github(format!("Failed to decode base64 content: {}", e)))?;

        String::from_utf8(decoded)
            .map(Some)
            .map_err(|e| WingetError::Github(format!("Invalid UTF-8 in file content: {}", e)))
    }

    /// Names of entries of one kind inside a directory, `None` on 404
    async fn list_dir(&self, path: &str, kind: ContentKind) -> WingetResult<Option<Vec<String>>> {
        match self.get_contents(path).await? {
            None => Ok(None),
            Some(ContentsResponse::Directory(entries)) => Ok(Some(
                entries
                    .into_iter()
                    .filter(|entry| entry.kind == kind)
                    .map(|entry| entry.name)
                    .collect(),
            )),
            Some(ContentsResponse::File(_)) => {
                Err(WingetError::Github(format!("{} is not a directory", path)))
            }
        }
    }

    fn require_token(&self) -> WingetResult<()> {
        if self.token.is_none() {
            return Err(WingetError::Credential(
                "A GitHub token is required for this operation".to_string(),
            ));
        }
        Ok(())
    }

    /// Commit at the head of the upstream branch
    async fn upstream_head(&self) -> WingetResult<String> {
        let head: GitRef = self
            .api_get(&self.upstream_url(&format!(
                "git/ref/heads/{}",
                encode_path(&self.upstream_branch)
            )))
            .await?;
        Ok(head.object.sha)
    }

    /// Send a request, tracking rate limits and mapping error statuses
    async fn api_request(&self, request: RequestBuilder) -> WingetResult<reqwest::Response> {
        // Check rate limit
        self.check_rate_limit().await?;

        let response = request
            .send()
            .await
            .map_err(|e| WingetError::Github(format!("GitHub API request failed: {}", e)))?;

        // Update rate limit from headers
        self.update_rate_limit(&response).await;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(WingetError::NotFound(response.url().path().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::UNPROCESSABLE_ENTITY && body.contains("already exists") {
                return Err(WingetError::AlreadyExists(body.trim().to_string()));
            }
            return Err(WingetError::Github(format!(
                "GitHub API error: HTTP {} {}",
                status,
                body.trim()
            )));
        }

        Ok(response)
    }

    /// Make an API GET request and parse JSON response
    async fn api_get<T: DeserializeOwned>(&self, url: &str) -> WingetResult<T> {
        self.api_send(Method::GET, url, None).await
    }

    async fn api_send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> WingetResult<T> {
        debug!(%method, url, "GitHub API request");
        let mut request = self.http_client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = self.api_request(request).await?;

        response
            .json()
            .await
            .map_err(|e| WingetError::Github(format!("Failed to parse GitHub API response: {}", e)))
    }

    /// Check if we're within rate limits
    async fn check_rate_limit(&self) -> WingetResult<()> {
        let remaining = *self.rate_limiter.remaining.lock().await;
        let reset_time = *self.rate_limiter.reset_time.lock().await;

        if remaining == 0 {
            let now = SystemTime::now();
            if now < reset_time {
                let wait_duration = reset_time.duration_since(now).unwrap_or(Duration::ZERO);
                return Err(WingetError::Github(format!(
                    "GitHub API rate limit exceeded. Reset in {} seconds. {}",
                    wait_duration.as_secs(),
                    if self.token.is_none() {
                        "Run `wingetup login` to increase the rate limit to 5000/hour."
                    } else {
                        ""
                    }
                )));
            }
        }

        Ok(())
    }

    /// Update rate limit from response headers
    async fn update_rate_limit(&self, response: &reqwest::Response) {
        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            *self.rate_limiter.remaining.lock().await = remaining;
        }

        if let Some(reset) = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            *self.rate_limiter.reset_time.lock().await =
                SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        }
    }
}

#[async_trait]
impl RepositoryReader for GitHubClient {
    async fn list_versions(&self, identifier: &PackageIdentifier) -> WingetResult<Vec<String>> {
        let dirs = self
            .list_dir(&package_dir(identifier), ContentKind::Dir)
            .await?
            .unwrap_or_default();

        // Capitalised directories hold sub-packages (`Publisher.App.Beta`)
        Ok(dirs
            .into_iter()
            .filter(|name| !name.starts_with(|c: char| c.is_ascii_uppercase()))
            .collect())
    }

    async fn list_files(
        &self,
        identifier: &PackageIdentifier,
        version: &str,
    ) -> WingetResult<Vec<String>> {
        self.list_dir(&version_dir(identifier, version), ContentKind::File)
            .await?
            .ok_or_else(|| {
                WingetError::NotFound(format!(
                    "{} {} does not exist in {}",
                    identifier,
                    version,
                    self.upstream_full_name()
                ))
            })
    }

    async fn read_file(&self, path: &str) -> WingetResult<Option<String>> {
        self.get_file_content(path).await
    }
}

#[async_trait]
impl RepositoryWriter for GitHubClient {
    async fn fork(&self) -> WingetResult<ForkRef> {
        self.require_token()?;
        let repo: GitHubRepo = self
            .api_send(Method::POST, &self.upstream_url("forks"), Some(json!({})))
            .await?;
        info!(owner = %repo.owner.login, repo = %repo.name, "Using fork");
        Ok(ForkRef {
            owner: repo.owner.login,
            repo: repo.name,
        })
    }

    async fn create_branch(&self, fork: &ForkRef, name: &str) -> WingetResult<BranchRef> {
        self.require_token()?;
        let head = self.upstream_head().await?;

        let created: GitRef = self
            .api_send(
                Method::POST,
                &self.fork_url(fork, "git/refs"),
                Some(json!({
                    "ref": format!("refs/heads/{}", name),
                    "sha": head,
                })),
            )
            .await?;
        debug!(branch = name, sha = %created.object.sha, "Created branch");

        Ok(BranchRef {
            name: name.to_string(),
            base_sha: created.object.sha,
        })
    }

    async fn reset_branch(&self, fork: &ForkRef, name: &str) -> WingetResult<BranchRef> {
        self.require_token()?;
        let head = self.upstream_head().await?;

        let reset: GitRef = self
            .api_send(
                Method::PATCH,
                &self.fork_url(fork, &format!("git/refs/heads/{}", encode_path(name))),
                Some(json!({ "sha": head, "force": true })),
            )
            .await?;
        debug!(branch = name, sha = %reset.object.sha, "Reset branch");

        Ok(BranchRef {
            name: name.to_string(),
            base_sha: reset.object.sha,
        })
    }

    async fn commit(
        &self,
        fork: &ForkRef,
        branch: &BranchRef,
        message: &str,
        changes: &[FileChange],
    ) -> WingetResult<CommitRef> {
        self.require_token()?;
        let parent: GitCommit = self
            .api_get(&self.fork_url(fork, &format!("git/commits/{}", branch.base_sha)))
            .await?;

        let entries: Vec<TreeEntry> = changes
            .iter()
            .map(|change| match change {
                FileChange::Upsert { path, content } => TreeEntry::upsert(path, content),
                FileChange::Delete { path } => TreeEntry::delete(path),
            })
            .collect();
        let files_written = entries.len();

        let tree: GitObject = self
            .api_send(
                Method::POST,
                &self.fork_url(fork, "git/trees"),
                Some(json!({ "base_tree": parent.tree.sha, "tree": entries })),
            )
            .await?;

        let commit: GitObject = self
            .api_send(
                Method::POST,
                &self.fork_url(fork, "git/commits"),
                Some(json!({
                    "message": message,
                    "tree": tree.sha,
                    "parents": [parent.sha],
                })),
            )
            .await?;

        let _: GitRef = self
            .api_send(
                Method::PATCH,
                &self.fork_url(fork, &format!("git/refs/heads/{}", encode_path(&branch.name))),
                Some(json!({ "sha": commit.sha, "force": false })),
            )
            .await?;

        info!(sha = %commit.sha, files = files_written, "Committed changes");
        Ok(CommitRef {
            sha: commit.sha,
            files_written,
        })
    }

    async fn open_pull_request(&self, draft: &PullRequestDraft) -> WingetResult<PullRequest> {
        self.require_token()?;
        let response: PullRequestResponse = self
            .api_send(
                Method::POST,
                &self.upstream_url("pulls"),
                Some(json!({
                    "title": draft.title,
                    "head": draft.head,
                    "base": draft.base,
                    "body": draft.body,
                })),
            )
            .await?;

        Ok(PullRequest {
            number: response.number,
            html_url: response.html_url,
        })
    }
}
