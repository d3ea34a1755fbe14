//! The interactive update workflow
//!
//! ```text
//! identifier -> lookup -> fetch (background) -> version -> join installer
//!   -> collect installers -> match -> join rest -> assemble -> commit -> PR
//! ```
//!
//! Each background part is joined right before the step that first needs
//! it. Returning early drops the pending fetches, which cancels them.

use super::assembler::{assemble, render, ManifestFile};
use super::commit::{branch_name, CommitBuilder, CommitResult};
use super::entry::InstallerEntry;
use super::loader::{PackageStatus, PreviousStateLoader};
use super::matcher::match_installers;
use crate::core::{WingetError, WingetResult};
use crate::di::{PullRequest, ServiceContainer};
use crate::manifest::{Installer, InstallerManifest, PackageIdentifier};
use crate::prompt::{ask, ask_scalar, UserInput};
use crate::validation::{fields, validate};
use tracing::{debug, info};

/// Why a session stopped without committing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The package has never been published
    NewPackage,
    /// The requested version does not exist
    VersionNotFound,
    /// The user answered no to a confirmation
    Declined,
    /// The user pressed Ctrl-C or closed the input
    Interrupted,
}

/// How a workflow ended. The caller decides the exit status.
#[derive(Debug)]
pub enum SessionOutcome {
    Completed(CommitResult, Option<PullRequest>),
    Aborted(AbortReason),
    Failed(WingetError),
}

impl SessionOutcome {
    /// Turn a workflow result into an outcome
    pub fn from_result(result: WingetResult<SessionOutcome>) -> Self {
        match result {
            Ok(outcome) => outcome,
            Err(WingetError::Interrupted) => SessionOutcome::Aborted(AbortReason::Interrupted),
            Err(e) => SessionOutcome::Failed(e),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub identifier: Option<String>,
    pub version: Option<String>,
    /// New installer URLs; skips the per-installer prompts when set
    pub urls: Vec<String>,
    /// Open the pull request without asking
    pub submit: bool,
}

pub struct UpdateSession<'a> {
    services: &'a ServiceContainer,
    input: &'a dyn UserInput,
}

impl<'a> UpdateSession<'a> {
    pub fn new(services: &'a ServiceContainer, input: &'a dyn UserInput) -> Self {
        Self { services, input }
    }

    pub async fn run(&self, request: &UpdateRequest) -> SessionOutcome {
        SessionOutcome::from_result(self.execute(request).await)
    }

    async fn execute(&self, request: &UpdateRequest) -> WingetResult<SessionOutcome> {
        self.check_urls(&request.urls)?;

        let identifier = PackageIdentifier::new(ask_scalar(
            self.input,
            &fields::package_identifier()?,
            request.identifier.as_deref(),
        )?);

        let loader = PreviousStateLoader::new(self.services.reader.clone());
        let (published, latest) = match loader.lookup(&identifier).await? {
            PackageStatus::NewPackage => {
                self.input.show_error(&format!(
                    "{} is not in the {} repository.",
                    identifier,
                    self.services.config.upstream_repo()
                ));
                self.input
                    .show("Please use the 'new' command to create a new manifest.");
                return Ok(SessionOutcome::Aborted(AbortReason::NewPackage));
            }
            PackageStatus::Published { versions, latest } => (versions, latest),
        };

        let mut previous = loader.fetch(&identifier, &latest);
        self.input
            .show(&format!("Updating {} from version {}", identifier, latest));

        let version = ask_scalar(
            self.input,
            &fields::package_version()?,
            request.version.as_deref(),
        )?;
        if published.contains(&version) {
            let overwrite = self.input.prompt_confirm(
                &format!("Version {} already exists. Overwrite it?", version),
                false,
            )?;
            if !overwrite {
                return Ok(SessionOutcome::Aborted(AbortReason::Declined));
            }
        }

        let installer_manifest: InstallerManifest = match previous.installer.join().await? {
            Some(manifest) => manifest.clone(),
            None => {
                return Err(WingetError::Manifest(format!(
                    "{} {} has no installer manifest",
                    identifier, latest
                )))
            }
        };
        let slots = &installer_manifest.installers;

        let entries = if request.urls.is_empty() {
            self.prompt_slots(&installer_manifest).await?
        } else {
            self.hash_urls(&request.urls).await?
        };

        let matches = match_installers(&entries, slots);
        for (previous_index, new_index) in matches.pairs() {
            debug!(previous_index, new_index, "Installer replaced");
        }

        let previous_set = previous.join_all().await?;
        let set = assemble(
            &identifier,
            &version,
            &matches,
            &entries,
            previous_set,
            self.services.config.manifest_version(),
        )?;
        let files = render(&identifier, &version, &set)?;

        self.show_files(&files);
        if !self.input.prompt_confirm("Commit these changes?", true)? {
            return Ok(SessionOutcome::Aborted(AbortReason::Declined));
        }

        let title = format!("{} version {}", identifier, version);
        let builder = CommitBuilder::new(self.services.writer.clone());
        let (fork, branch) = builder
            .prepare_branch(&branch_name(&identifier, &version, &files))
            .await?;
        let result = builder.build_commit(fork, branch, &title, &files).await?;
        self.input.show(&format!(
            "✓ Committed {} files to {}",
            result.files.len(),
            result.head()
        ));

        let submit = request.submit || self.input.prompt_confirm("Open a pull request?", true)?;
        let pull_request = if submit {
            let body = format!("Created with wingetup v{}", env!("CARGO_PKG_VERSION"));
            let pr = builder
                .open_pull_request(
                    &result,
                    &title,
                    &body,
                    self.services.config.upstream_branch(),
                )
                .await?;
            self.input
                .show(&format!("✓ Pull request opened: {}", pr.html_url));
            Some(pr)
        } else {
            None
        };

        info!(%identifier, %version, "Update finished");
        Ok(SessionOutcome::Completed(result, pull_request))
    }

    /// Reject every invalid `--urls` value at once
    fn check_urls(&self, urls: &[String]) -> WingetResult<()> {
        if urls.is_empty() {
            return Ok(());
        }
        let rule = fields::installer_url()?.rule;
        let mut invalid = 0;
        for url in urls {
            if let Err(rejection) = validate(url, &rule) {
                self.input
                    .show_error(&format!("Invalid installer URL {}: {}", url, rejection));
                invalid += 1;
            }
        }
        if invalid > 0 {
            return Err(WingetError::Validation(format!(
                "{} of {} installer URLs are invalid",
                invalid,
                urls.len()
            )));
        }
        Ok(())
    }

    /// Ask for a new URL for every published installer
    async fn prompt_slots(&self, manifest: &InstallerManifest) -> WingetResult<Vec<InstallerEntry>> {
        let slots = &manifest.installers;
        let url_field = fields::installer_url()?;
        let mut entries: Vec<InstallerEntry> = Vec::with_capacity(slots.len());

        while entries.len() < slots.len() {
            let slot = &slots[entries.len()];
            self.show_slot(entries.len(), manifest, slot);

            let url = ask_scalar(self.input, &url_field, None)?;
            let mut code_field = fields::product_code();
            if let Some(code) = &slot.product_code {
                code_field = code_field.with_default(code.clone());
            }
            let product_code = ask(self.input, &code_field)?.into_option();

            let sha256 = self.hash(&url).await?;
            let index = entries.len();
            entries.push(InstallerEntry::for_slot(index, slot, url, sha256, product_code));
        }
        Ok(entries)
    }

    async fn hash_urls(&self, urls: &[String]) -> WingetResult<Vec<InstallerEntry>> {
        let mut entries = Vec::with_capacity(urls.len());
        for url in urls {
            let sha256 = self.hash(url).await?;
            entries.push(InstallerEntry::from_url(url.clone(), sha256));
        }
        Ok(entries)
    }

    async fn hash(&self, url: &str) -> WingetResult<String> {
        self.input.show(&format!("Downloading {}", url));
        let sha256 = self.services.hasher.sha256(url).await?;
        debug!(%url, %sha256, "Hashed installer");
        Ok(sha256)
    }

    fn show_slot(&self, index: usize, manifest: &InstallerManifest, slot: &Installer) {
        let mut lines = vec![
            format!("Installer Entry {}/{}", index + 1, manifest.installers.len()),
            format!("  Architecture: {}", slot.architecture),
        ];
        if let Some(kind) = slot.installer_type.or(manifest.installer_type) {
            lines.push(format!("  Installer Type: {}", kind));
        }
        if let Some(scope) = slot.scope.or(manifest.scope) {
            lines.push(format!("  Scope: {}", scope));
        }
        if let Some(locale) = slot
            .installer_locale
            .as_deref()
            .or(manifest.installer_locale.as_deref())
        {
            lines.push(format!("  Locale: {}", locale));
        }
        lines.push(format!("  Previous Url: {}", slot.installer_url));
        self.input.show(&lines.join("\n"));
    }

    fn show_files(&self, files: &[ManifestFile]) {
        let written: Vec<&str> = files
            .iter()
            .filter(|f| f.content.is_some())
            .map(|f| f.path.as_str())
            .collect();
        self.input
            .show(&format!("Files to commit:\n  {}", written.join("\n  ")));
    }
}
