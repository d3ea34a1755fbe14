//! Service container for dependency injection

use super::traits::{ConfigProvider, InstallerHasher, RepositoryReader, RepositoryWriter};
use crate::config::Config;
use crate::core::WingetResult;
use crate::github::GitHubClient;
use crate::installer::Downloader;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Built once per command and passed by reference into each workflow. It
/// uses `Arc<dyn Trait>` so tests can swap in the mocks from
/// [`crate::di::mocks`].
///
/// # Example (Testing)
///
/// ```
/// use wingetup::di::{ServiceContainer, mocks::*};
/// use std::sync::Arc;
///
/// let repository = Arc::new(MockRepository::new());
/// let container = ServiceContainer::with_providers(
///     Arc::new(MockConfigProvider::default()),
///     repository.clone(),
///     repository,
///     Arc::new(MockInstallerHasher::new()),
/// );
/// assert_eq!(container.config().upstream_repo(), "winget-pkgs");
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub reader: Arc<dyn RepositoryReader>,
    pub writer: Arc<dyn RepositoryWriter>,
    pub hasher: Arc<dyn InstallerHasher>,
}

impl ServiceContainer {
    /// Create a new service container with production implementations
    ///
    /// Loads config from disk, resolves the GitHub token and builds one
    /// GitHub client that serves both repository roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or created, or
    /// the HTTP clients cannot be built.
    pub fn new() -> WingetResult<Self> {
        let config = Config::load()?;
        let token = config.resolve_token();
        let github = Arc::new(GitHubClient::new(&config, token)?);

        Ok(Self {
            config: Arc::new(config),
            reader: github.clone(),
            writer: github,
            hasher: Arc::new(Downloader::new()?),
        })
    }

    /// Create a service container with custom provider implementations
    pub fn with_providers(
        config: Arc<dyn ConfigProvider>,
        reader: Arc<dyn RepositoryReader>,
        writer: Arc<dyn RepositoryWriter>,
        hasher: Arc<dyn InstallerHasher>,
    ) -> Self {
        Self {
            config,
            reader,
            writer,
            hasher,
        }
    }

    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    pub fn reader(&self) -> &dyn RepositoryReader {
        self.reader.as_ref()
    }

    pub fn writer(&self) -> &dyn RepositoryWriter {
        self.writer.as_ref()
    }

    pub fn hasher(&self) -> &dyn InstallerHasher {
        self.hasher.as_ref()
    }
}
