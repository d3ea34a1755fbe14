//! Dependency injection infrastructure for wingetup
//!
//! Workflows talk to GitHub, the installer host and the config file only
//! through the traits in [`traits`], collected in a [`ServiceContainer`].
//!
//! # Example (Production)
//! ```no_run
//! use wingetup::di::ServiceContainer;
//!
//! # fn example() -> wingetup::core::WingetResult<()> {
//! let container = ServiceContainer::new()?;
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{
    BranchRef, CommitRef, ConfigProvider, FileChange, ForkRef, InstallerHasher, PullRequest,
    PullRequestDraft, RepositoryReader, RepositoryWriter,
};
