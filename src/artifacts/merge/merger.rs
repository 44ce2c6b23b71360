use crate::areas::database::Database;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::merge::resolution::{Resolution, ThreeWayMerge};
use crate::artifacts::merge::{ConflictReport, MergeOutcome, merge_message};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use derive_new::new;

/// A merge whose files are resolved but whose outcome is not yet recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMerge {
    pub base: ObjectId,
    pub ours: ObjectId,
    pub theirs: ObjectId,
    pub resolution: Resolution,
}

/// Merges two commits of one object database
///
/// The merger only reads the graph and, on a clean merge, freezes the merge commit. Moving
/// refs and touching the working directory is left to the caller.
#[derive(Debug, new)]
pub struct Merger<'d> {
    database: &'d Database,
}

impl Merger<'_> {
    pub fn merge_base(&self, ours: &ObjectId, theirs: &ObjectId) -> Result<ObjectId> {
        let finder =
            BCAFinder::new(|oid| Ok(self.database.load_commit(oid)?.parents().to_vec()));

        finder
            .find_best_common_ancestor(ours, theirs)?
            .ok_or_else(|| RepositoryError::NoCommonAncestor {
                ours: ours.to_string(),
                theirs: theirs.to_string(),
            })
    }

    /// Merge `theirs` into `ours`
    ///
    /// A clean merge creates a commit with parents `[ours, theirs]` and the message
    /// `Merge <theirs_ref> into <ours_ref>`. Conflicts are a successful outcome carrying a
    /// [`ConflictReport`].
    pub fn merge(
        &self,
        ours: &ObjectId,
        theirs: &ObjectId,
        ours_ref: &str,
        theirs_ref: &str,
        timestamp: i64,
    ) -> Result<MergeOutcome> {
        match self.prepare(ours, theirs)? {
            Some(pending) => self.conclude(pending, ours_ref, theirs_ref, timestamp),
            None => Ok(MergeOutcome::UpToDate),
        }
    }

    /// Find the merge base and resolve the files, without recording anything
    ///
    /// `None` when `theirs` is already an ancestor of `ours`.
    pub fn prepare(&self, ours: &ObjectId, theirs: &ObjectId) -> Result<Option<PendingMerge>> {
        let base = self.merge_base(ours, theirs)?;

        if &base == theirs {
            tracing::debug!(%ours, %theirs, "merged-in commit is already an ancestor");
            return Ok(None);
        }

        let base_commit = self.database.load_commit(&base)?;
        let ours_commit = self.database.load_commit(ours)?;
        let theirs_commit = self.database.load_commit(theirs)?;

        let resolution = ThreeWayMerge::new(
            base_commit.files(),
            ours_commit.files(),
            theirs_commit.files(),
        )
        .resolve();

        Ok(Some(PendingMerge {
            base,
            ours: ours.clone(),
            theirs: theirs.clone(),
            resolution,
        }))
    }

    /// Record a prepared merge: the merge commit when clean, the report otherwise
    pub fn conclude(
        &self,
        pending: PendingMerge,
        ours_ref: &str,
        theirs_ref: &str,
        timestamp: i64,
    ) -> Result<MergeOutcome> {
        let PendingMerge {
            base,
            ours,
            theirs,
            resolution,
        } = pending;

        if !resolution.is_clean() {
            tracing::info!(
                %base,
                conflicts = resolution.conflicts.len(),
                "merge stopped on conflicts"
            );

            return Ok(MergeOutcome::Conflicted(ConflictReport {
                base,
                ours,
                theirs,
                merged: resolution.merged,
                conflicts: resolution.conflicts,
            }));
        }

        let commit = self.database.create_commit(
            vec![ours, theirs],
            resolution.merged,
            merge_message(theirs_ref, ours_ref),
            timestamp,
        )?;

        Ok(MergeOutcome::Merged(commit))
    }
}
