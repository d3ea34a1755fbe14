//! Updating a published package
//!
//! The engine behind `wingetup update`:
//! - [`loader`]: background fetches of the last published manifests
//! - [`matcher`]: pairing new installers with published ones
//! - [`assembler`]: merging them into a new manifest set and rendering it
//! - [`commit`]: staging the files as one commit on a fork
//! - [`session`]: the prompt-driven workflow tying them together

pub mod assembler;
pub mod commit;
pub mod entry;
pub mod loader;
pub mod matcher;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use assembler::{assemble, render, ManifestFile};
pub use commit::{branch_name, CommitBuilder, CommitResult};
pub use entry::InstallerEntry;
pub use loader::{PackageStatus, Prefetch, PreviousManifests, PreviousStateLoader};
pub use matcher::{match_installers, MatchResult};
pub use session::{AbortReason, SessionOutcome, UpdateRequest, UpdateSession};
