//! Merge engine
//!
//! - `bca_finder`: merge base computation over the commit graph
//! - `resolution`: file-level three-way merge of commit snapshots
//! - `merger`: ties the two together against the object database
//! - `merge_state`: the record a conflicted merge leaves behind

use crate::artifacts::merge::resolution::Conflict;
use crate::artifacts::objects::commit::{Commit, FileMap};
use crate::artifacts::objects::object_id::ObjectId;

pub mod bca_finder;
pub mod merge_state;
pub mod merger;
pub mod resolution;

/// Outcome of merging one commit into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every path resolved; the merge commit has been created
    Merged(Commit),
    /// The merged-in commit is already part of the current history; nothing was created
    UpToDate,
    /// Some paths need manual resolution; no commit was created
    Conflicted(ConflictReport),
}

/// Everything a caller needs to resolve a conflicted merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
    pub base: ObjectId,
    pub ours: ObjectId,
    pub theirs: ObjectId,
    /// Cleanly merged paths
    pub merged: FileMap,
    pub conflicts: Vec<Conflict>,
}

/// Message of the commit recording a merge
pub fn merge_message(theirs_ref: &str, ours_ref: &str) -> String {
    format!("Merge {theirs_ref} into {ours_ref}")
}
