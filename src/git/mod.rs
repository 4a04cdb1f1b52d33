//! Version control for the data directory.
//!
//! Decks are plain files, so any git remote can carry them between
//! machines. Storage commits after writes; `sync` pulls then pushes.

mod repo;

pub use repo::GitRepo;

use crate::error::Result;

/// Operations storage needs from a version control backend.
pub trait GitClient: Send + Sync {
    /// Whether the data directory is a repository.
    fn is_initialized(&self) -> bool;

    /// Stage every change in the working tree.
    fn add_all(&self) -> Result<()>;

    /// Commit staged changes. An empty commit is not an error.
    fn commit(&self, message: &str) -> Result<()>;

    fn pull(&self) -> Result<()>;

    fn push(&self) -> Result<()>;
}
