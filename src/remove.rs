//! Removing a published package version
//!
//! Deletes every file of the version directory in one commit and opens a
//! pull request that carries the reason.

use crate::core::{WingetError, WingetResult};
use crate::di::ServiceContainer;
use crate::manifest::paths::version_dir;
use crate::manifest::PackageIdentifier;
use crate::prompt::{ask_scalar, UserInput};
use crate::update::{branch_name, AbortReason, CommitBuilder, ManifestFile, SessionOutcome};
use crate::validation::fields;
use tracing::info;

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct RemoveRequest {
    pub identifier: Option<String>,
    pub version: Option<String>,
    pub reason: Option<String>,
}

pub async fn run(
    services: &ServiceContainer,
    input: &dyn UserInput,
    request: &RemoveRequest,
) -> SessionOutcome {
    SessionOutcome::from_result(execute(services, input, request).await)
}

async fn execute(
    services: &ServiceContainer,
    input: &dyn UserInput,
    request: &RemoveRequest,
) -> WingetResult<SessionOutcome> {
    let identifier = PackageIdentifier::new(ask_scalar(
        input,
        &fields::package_identifier()?,
        request.identifier.as_deref(),
    )?);
    let version = ask_scalar(input, &fields::package_version()?, request.version.as_deref())?;

    let names = match services.reader.list_files(&identifier, &version).await {
        Ok(names) => names,
        Err(WingetError::NotFound(_)) => {
            input.show_error(&format!(
                "{} {} does not exist in {}/{}",
                identifier,
                version,
                services.config.upstream_owner(),
                services.config.upstream_repo()
            ));
            return Ok(SessionOutcome::Aborted(AbortReason::VersionNotFound));
        }
        Err(e) => return Err(e),
    };

    let reason = ask_scalar(input, &fields::deletion_reason(), request.reason.as_deref())?;

    let dir = version_dir(&identifier, &version);
    let paths: Vec<String> = names.iter().map(|name| format!("{}/{}", dir, name)).collect();
    input.show(&format!("Files to delete:\n  {}", paths.join("\n  ")));
    if !input.prompt_confirm(
        &format!("Remove {} version {}?", identifier, version),
        false,
    )? {
        return Ok(SessionOutcome::Aborted(AbortReason::Declined));
    }

    let staged: Vec<ManifestFile> = paths
        .iter()
        .map(|path| ManifestFile {
            path: path.clone(),
            content: None,
        })
        .collect();
    let branch = format!("Remove-{}", branch_name(&identifier, &version, &staged));

    let title = format!("Remove: {} version {}", identifier, version);
    let builder = CommitBuilder::new(services.writer.clone());
    let (fork, branch) = builder.prepare_branch(&branch).await?;
    let result = builder.build_deletion(fork, branch, &title, &paths).await?;

    let body = format!("## {}", reason);
    let pr = builder
        .open_pull_request(&result, &title, &body, services.config.upstream_branch())
        .await?;
    input.show(&format!("✓ Pull request opened: {}", pr.html_url));

    info!(%identifier, %version, "Removal submitted");
    Ok(SessionOutcome::Completed(result, Some(pr)))
}
