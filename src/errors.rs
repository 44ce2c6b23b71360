//! Repository errors
//!
//! Every core operation returns [`Result`]. Merge conflicts are deliberately absent from this
//! enum: a conflicted merge is a successful call returning
//! [`MergeOutcome::Conflicted`](crate::artifacts::merge::MergeOutcome::Conflicted).

use crate::artifacts::checkout::conflict::WorkspaceConflicts;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("unknown revision '{0}'")]
    UnknownRef(String),

    #[error("invalid parent commit: {0}")]
    InvalidParent(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("no common ancestor between {ours} and {theirs}")]
    NoCommonAncestor { ours: String, theirs: String },

    #[error("HEAD is detached; use --allow-detached to commit on top of it")]
    DetachedHeadCommitForbidden,

    #[error("invalid path {0:?}: control characters cannot be tracked")]
    InvalidPath(String),

    #[error("invalid branch name: '{0}'")]
    InvalidBranchName(String),

    #[error("a merge is in progress; run 'merge --continue' or 'merge --abort' first")]
    MergeInProgress,

    #[error("there is no merge in progress")]
    NoMergeInProgress,

    #[error("unresolved conflicts in: {}", .0.join(", "))]
    UnresolvedConflicts(Vec<String>),

    #[error("{0}")]
    WorkspaceConflict(WorkspaceConflicts),

    #[error("nothing to commit, the staging area is empty")]
    NothingToCommit,

    #[error("not a minigit repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("corrupt repository data: {0}")]
    Corrupt(String),

    #[error("I/O failure: {0}")]
    IOFailure(#[from] std::io::Error),
}

impl RepositoryError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        RepositoryError::Corrupt(message.into())
    }

    /// Whether the error is a missing object, commit, ref or file
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}
