//! Background loading of the last published manifests
//!
//! Fetches start as soon as the package is known and run while the user is
//! still answering prompts. Each part is a [`Prefetch`] that the session
//! joins right before its first use.

use crate::core::version::latest;
use crate::core::{WingetError, WingetResult};
use crate::di::RepositoryReader;
use crate::manifest::codec::{decode, peek_kind};
use crate::manifest::paths::{is_locale_file, manifest_path, version_dir};
use crate::manifest::{
    DefaultLocaleManifest, InstallerManifest, LocaleManifest, ManifestKind, ManifestSet,
    PackageIdentifier, VersionManifest,
};
use futures_util::future::try_join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info};

enum PrefetchState<T> {
    Pending(JoinHandle<WingetResult<T>>),
    Ready(T),
    Failed(String),
    Taken,
}

/// A value being fetched by a background task.
///
/// Dropping a prefetch that was never joined aborts its task.
pub struct Prefetch<T> {
    part: &'static str,
    state: PrefetchState<T>,
}

impl<T: Send + 'static> Prefetch<T> {
    fn spawn<F>(part: &'static str, fetch: F) -> Self
    where
        F: Future<Output = WingetResult<T>> + Send + 'static,
    {
        debug!(part, "Starting prefetch");
        Self {
            part,
            state: PrefetchState::Pending(tokio::spawn(fetch)),
        }
    }

    /// Wrap an already known value
    pub fn ready(part: &'static str, value: T) -> Self {
        Self {
            part,
            state: PrefetchState::Ready(value),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, PrefetchState::Pending(_))
    }

    /// Wait for the fetch to finish and borrow its result
    pub async fn join(&mut self) -> WingetResult<&T> {
        if let PrefetchState::Pending(handle) = &mut self.state {
            debug!(part = self.part, "Joining prefetch");
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(WingetError::Github(format!(
                    "Fetching the {} failed: {}",
                    self.part, e
                ))),
            };
            match outcome {
                Ok(value) => self.state = PrefetchState::Ready(value),
                Err(e) => {
                    self.state = PrefetchState::Failed(e.to_string());
                    return Err(e);
                }
            }
        }

        match &self.state {
            PrefetchState::Ready(value) => Ok(value),
            PrefetchState::Failed(message) => Err(WingetError::Github(message.clone())),
            PrefetchState::Taken => Err(WingetError::Manifest(format!(
                "The {} was already consumed",
                self.part
            ))),
            PrefetchState::Pending(_) => Err(WingetError::Manifest(format!(
                "The {} is still loading",
                self.part
            ))),
        }
    }

    /// Wait for the fetch to finish and take ownership of its result
    pub async fn take(&mut self) -> WingetResult<T> {
        self.join().await?;
        match std::mem::replace(&mut self.state, PrefetchState::Taken) {
            PrefetchState::Ready(value) => Ok(value),
            _ => Err(WingetError::Manifest(format!(
                "The {} was already consumed",
                self.part
            ))),
        }
    }
}

impl<T> Drop for Prefetch<T> {
    fn drop(&mut self) {
        if let PrefetchState::Pending(handle) = &self.state {
            debug!(part = self.part, "Cancelling prefetch");
            handle.abort();
        }
    }
}

/// Whether a package has anything to update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageStatus {
    NewPackage,
    Published {
        versions: Vec<String>,
        latest: String,
    },
}

/// The four parts of the last published version, each loading independently
pub struct PreviousManifests {
    pub version: String,
    pub installer: Prefetch<Option<InstallerManifest>>,
    pub version_manifest: Prefetch<Option<VersionManifest>>,
    pub default_locale: Prefetch<Option<DefaultLocaleManifest>>,
    pub locales: Prefetch<Vec<LocaleManifest>>,
}

impl PreviousManifests {
    /// Join every part and collect them into a manifest set
    pub async fn join_all(&mut self) -> WingetResult<ManifestSet> {
        let set = ManifestSet {
            installer: self.installer.take().await?,
            version: self.version_manifest.take().await?,
            default_locale: self.default_locale.take().await?,
            locales: self.locales.take().await?,
        };
        if !set.is_consistent() {
            return Err(WingetError::Manifest(format!(
                "Published manifests for version {} disagree on identifier or version",
                self.version
            )));
        }
        Ok(set)
    }
}

/// Starts and tracks the fetches of a package's published state
pub struct PreviousStateLoader {
    reader: Arc<dyn RepositoryReader>,
}

/// Locale file texts, listed and read once for both locale parts
type LocaleFiles = Arc<OnceCell<Vec<String>>>;

impl PreviousStateLoader {
    pub fn new(reader: Arc<dyn RepositoryReader>) -> Self {
        Self { reader }
    }

    /// Find the published versions of a package
    pub async fn lookup(&self, identifier: &PackageIdentifier) -> WingetResult<PackageStatus> {
        let versions = self.reader.list_versions(identifier).await?;
        let latest = latest(versions.iter().map(String::as_str)).map(str::to_string);

        match latest {
            None => {
                info!(%identifier, "Package has no published versions");
                Ok(PackageStatus::NewPackage)
            }
            Some(latest) => {
                info!(%identifier, %latest, count = versions.len(), "Found published versions");
                Ok(PackageStatus::Published { versions, latest })
            }
        }
    }

    /// Start fetching every manifest of `version` in the background
    pub fn fetch(&self, identifier: &PackageIdentifier, version: &str) -> PreviousManifests {
        let locale_files: LocaleFiles = Arc::new(OnceCell::new());

        let installer = {
            let reader = self.reader.clone();
            let path = manifest_path(identifier, version, ManifestKind::Installer, None);
            Prefetch::spawn("installer manifest", async move {
                match reader.read_file(&path).await? {
                    Some(text) => {
                        decode::<InstallerManifest>(&text, ManifestKind::Installer).map(Some)
                    }
                    None => Ok(None),
                }
            })
        };

        let version_manifest = {
            let reader = self.reader.clone();
            let path = manifest_path(identifier, version, ManifestKind::Version, None);
            Prefetch::spawn("version manifest", async move {
                match reader.read_file(&path).await? {
                    Some(text) => {
                        decode::<VersionManifest>(&text, ManifestKind::Version).map(Some)
                    }
                    None => Ok(None),
                }
            })
        };

        let default_locale = {
            let reader = self.reader.clone();
            let files = locale_files.clone();
            let identifier = identifier.clone();
            let version = version.to_string();
            Prefetch::spawn("default locale manifest", async move {
                let texts = load_locale_files(&reader, &files, &identifier, &version).await?;
                for text in texts {
                    if peek_kind(text)? == ManifestKind::DefaultLocale {
                        return decode::<DefaultLocaleManifest>(text, ManifestKind::DefaultLocale)
                            .map(Some);
                    }
                }
                Ok(None)
            })
        };

        let locales = {
            let reader = self.reader.clone();
            let files = locale_files;
            let identifier = identifier.clone();
            let version = version.to_string();
            Prefetch::spawn("locale manifests", async move {
                let texts = load_locale_files(&reader, &files, &identifier, &version).await?;
                let mut locales = Vec::new();
                for text in texts {
                    if peek_kind(text)? == ManifestKind::Locale {
                        locales.push(decode::<LocaleManifest>(text, ManifestKind::Locale)?);
                    }
                }
                Ok(locales)
            })
        };

        PreviousManifests {
            version: version.to_string(),
            installer,
            version_manifest,
            default_locale,
            locales,
        }
    }
}

/// List the version directory and read every locale file, once.
/// Files come back sorted by name.
async fn load_locale_files<'a>(
    reader: &Arc<dyn RepositoryReader>,
    cell: &'a OnceCell<Vec<String>>,
    identifier: &PackageIdentifier,
    version: &str,
) -> WingetResult<&'a Vec<String>> {
    cell.get_or_try_init(|| async {
        let mut names: Vec<String> = reader
            .list_files(identifier, version)
            .await?
            .into_iter()
            .filter(|name| is_locale_file(identifier, name))
            .collect();
        names.sort();

        let dir = version_dir(identifier, version);
        let reads = names.iter().map(|name| {
            let path = format!("{}/{}", dir, name);
            async move {
                reader
                    .read_file(&path)
                    .await?
                    .ok_or_else(|| WingetError::NotFound(path.clone()))
            }
        });
        let texts = try_join_all(reads).await?;
        debug!(count = texts.len(), "Loaded locale files");
        Ok::<_, WingetError>(texts)
    })
    .await
}
