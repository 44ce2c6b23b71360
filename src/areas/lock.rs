//! Repository-level lock
//!
//! Mutating operations (commit, branch creation, ref moves, merge) take an exclusive lock on
//! `.minigit/lock` for their whole duration. The lock is tied to the guard value, so it is
//! released on every exit path, early `?` returns included. Reads never take it: blobs and
//! commits are immutable once written.

use crate::errors::Result;
use file_guard::{FileGuard, Lock};
use std::fs::File;
use std::path::Path;

/// Name of the lock file inside the repository directory
pub const LOCK_FILE_NAME: &str = "lock";

pub struct RepositoryLock {
    _guard: FileGuard<Box<File>>,
}

impl RepositoryLock {
    /// Block until the exclusive repository lock is held
    pub fn acquire(repository_dir: &Path) -> Result<Self> {
        let lock_path = repository_dir.join(LOCK_FILE_NAME);
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)?;

        let guard = file_guard::lock(Box::new(file), Lock::Exclusive, 0, 1)?;
        tracing::trace!(path = %lock_path.display(), "acquired repository lock");

        Ok(RepositoryLock { _guard: guard })
    }
}

impl std::fmt::Debug for RepositoryLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryLock").finish_non_exhaustive()
    }
}
