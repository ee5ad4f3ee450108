//! Persisted lock record and repository reconciliation for libretto.
//!
//! The `Locker` owns the record of exactly which package versions were
//! chosen for a dependency graph: `lock_packages` persists an ordered set
//! of resolved packages as a `LockRecord`, and `locked_packages` turns the
//! persisted record back into live `Package` entities by resolving every
//! entry against a `RepositoryManager`. Both directions are all-or-nothing.

pub mod locker;
pub mod record;
pub mod resource;

pub use locker::{Locker, RepositoryManager};
pub use record::{LockEntry, LockRecord};
pub use resource::{JsonLockFile, LockResource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock file '{0}' does not exist")]
    NotLocked(String),
    #[error("locked package {package} {version} could not be found in the repository")]
    UnresolvedEntry { package: String, version: String },
    #[error("package '{0}' cannot be locked: a non-empty name and version are required")]
    UnlockablePackage(String),
    #[error("lock file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lock file parse error: {0}")]
    ParseJson(#[from] serde_json::Error),
}
